use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::pricing::PricingError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("Payment of {amount} exceeds the {outstanding} owed")]
    Overpayment { outstanding: Decimal, amount: Decimal },
    #[error("Order already settled: {0}")]
    AlreadySettled(String),
    #[error("Order already invoiced: {0}")]
    AlreadyInvoiced(String),
    #[error("Order has recorded payments: {0}")]
    HasPayments(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
