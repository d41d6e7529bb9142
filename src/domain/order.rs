use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{compute_totals, DiscountPercent, LineItem, OrderTotals};
use super::{PaymentStatus, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    EnRoute,
    Delivered,
    PartialReturn,
    Cancelled,
    Consignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderKind {
    #[default]
    Normal,
    Consignment,
}

/// Represents a customer order. Totals are always derived from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub zone: Zone,
    pub driver_id: Option<String>,
    pub delivery_date: NaiveDate,
    pub kind: OrderKind,
    pub items: Vec<LineItem>,
    pub discount: DiscountPercent,
    pub status: DeliveryStatus,
    pub payment_status: PaymentStatus,
    /// Amount applied so far, including charges to the current account.
    pub settled: Decimal,
    /// Portion of `settled` actually collected.
    pub paid: Decimal,
    /// Set while a fiscal document for the order is issued and not voided.
    pub invoiced: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for storing a validated order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: String,
    pub zone: Zone,
    pub driver_id: Option<String>,
    pub delivery_date: NaiveDate,
    pub kind: OrderKind,
    pub items: Vec<LineItem>,
    pub discount: DiscountPercent,
    pub notes: String,
}

/// Header fields an operator can change after creation.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<DeliveryStatus>,
    pub driver_id: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A raw order line as typed into a form.
///
/// `price_per_unit` is optional: when absent the catalog price for the
/// customer's price list is used.
#[derive(Debug, Clone)]
pub struct LineItemDraft {
    pub product_id: String,
    pub quantity: f64,
    pub price_per_unit: Option<f64>,
}

impl LineItemDraft {
    pub fn new(product_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price_per_unit: None,
        }
    }

    pub fn at_price(mut self, price_per_unit: f64) -> Self {
        self.price_per_unit = Some(price_per_unit);
        self
    }
}

/// Unvalidated order input.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: String,
    pub driver_id: Option<String>,
    pub delivery_date: NaiveDate,
    pub kind: OrderKind,
    pub items: Vec<LineItemDraft>,
    pub discount_percent: f64,
    pub notes: String,
}

impl OrderDraft {
    pub fn new(customer_id: impl Into<String>, delivery_date: NaiveDate) -> Self {
        Self {
            customer_id: customer_id.into(),
            driver_id: None,
            delivery_date,
            kind: OrderKind::Normal,
            items: Vec::new(),
            discount_percent: 0.0,
            notes: String::new(),
        }
    }

    pub fn item(mut self, item: LineItemDraft) -> Self {
        self.items.push(item);
        self
    }

    pub fn discount(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }
}

/// Criteria for listing orders. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub zone: Option<Zone>,
    pub status: Option<DeliveryStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub customer_id: Option<String>,
    pub delivery_date: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.zone.map_or(true, |zone| order.zone == zone)
            && self.status.map_or(true, |status| order.status == status)
            && self.payment_status.map_or(true, |status| order.payment_status == status)
            && self.customer_id.as_ref().map_or(true, |id| &order.customer_id == id)
            && self.delivery_date.map_or(true, |date| order.delivery_date == date)
    }
}

impl Order {
    pub fn totals(&self) -> OrderTotals {
        compute_totals(&self.items, self.discount)
    }

    /// What is still owed once recorded payments and account charges are applied.
    pub fn outstanding(&self) -> Decimal {
        self.totals().total - self.settled
    }

    pub fn has_payments(&self) -> bool {
        !self.settled.is_zero()
    }
}
