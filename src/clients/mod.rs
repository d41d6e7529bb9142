//! Typed clients, one per record service. Orchestration across services
//! (order creation, payment recording) lives in the order and billing clients.

#[macro_use]
mod macros;

pub mod billing_client;
pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use billing_client::*;
pub use customer_client::*;
pub use order_client::*;
pub use product_client::*;
