//! Orders: header edits, item/discount replacement and payment bookkeeping.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
