use thiserror::Error;

use crate::billing_actor::BillingError;
use crate::customer_actor::CustomerError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use super::settings::SettingsError;

/// Failures surfaced by the running system as a whole.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
