use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::customer_actor::CustomerError;
use crate::order_actor::OrderError;

/// Errors that can occur while collecting payments or issuing invoices.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BillingError {
    #[error("Billing record not found: {0}")]
    NotFound(String),
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(f64),
    #[error("Invoice already voided: {0}")]
    AlreadyVoided(String),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for BillingError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => BillingError::NotFound(id),
            other => BillingError::ActorCommunicationError(other.to_string()),
        }
    }
}
