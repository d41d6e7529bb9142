pub mod collection;
pub mod customer;
pub mod invoice;
pub mod order;
pub mod product;
pub mod zone;

pub use collection::*;
pub use customer::*;
pub use invoice::*;
pub use order::*;
pub use product::*;
pub use zone::*;
