use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
    CurrentAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
    Unpaid,
}

impl PaymentStatus {
    /// Status of an order with `total` owed after `paid` was collected.
    pub fn resolve(total: Decimal, paid: Decimal) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStatus {
    PendingVerification,
    Verified,
}

/// A payment collected against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub zone: Zone,
    pub method: PaymentMethod,
    /// Amount applied to the order, excluding change.
    pub amount: Decimal,
    pub change: Decimal,
    pub receipt: Option<String>,
    pub status: CollectionStatus,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CollectionCreate {
    pub order_id: String,
    pub customer_id: String,
    pub zone: Zone,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub change: Decimal,
    pub receipt: Option<String>,
}

/// Raw payment input from a driver or operator.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub amount: f64,
    pub receipt: Option<String>,
}

impl PaymentInput {
    pub fn new(method: PaymentMethod, amount: f64) -> Self {
        Self {
            method,
            amount,
            receipt: None,
        }
    }

    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub zone: Option<Zone>,
    pub method: Option<PaymentMethod>,
    pub status: Option<CollectionStatus>,
}

impl CollectionFilter {
    pub fn matches(&self, collection: &Collection) -> bool {
        self.zone.map_or(true, |zone| collection.zone == zone)
            && self.method.map_or(true, |method| collection.method == method)
            && self.status.map_or(true, |status| collection.status == status)
    }
}
