use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{OrderTotals, VatBreakdown};
use super::{Customer, VatCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceKind {
    /// Invoice for registered VAT payers, VAT itemized.
    A,
    /// Invoice for every other VAT condition.
    B,
    /// Non-fiscal document for customers with incomplete fiscal data.
    DeliveryNote,
}

impl InvoiceKind {
    pub fn for_customer(customer: &Customer) -> Self {
        if !customer.has_complete_fiscal_data() {
            return InvoiceKind::DeliveryNote;
        }
        match customer.vat_condition {
            Some(VatCondition::RegisteredPayer) => InvoiceKind::A,
            _ => InvoiceKind::B,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Issued,
    Voided,
}

/// An issued invoice or delivery note. The id is the document number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub order_id: String,
    pub customer_id: String,
    pub kind: InvoiceKind,
    pub totals: OrderTotals,
    pub vat: VatBreakdown,
    pub status: InvoiceStatus,
    pub issued_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct InvoiceCreate {
    pub order_id: String,
    pub customer_id: String,
    pub kind: InvoiceKind,
    pub totals: OrderTotals,
    pub vat: VatBreakdown,
    pub issued_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub kind: Option<InvoiceKind>,
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<String>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.kind.map_or(true, |kind| invoice.kind == kind)
            && self.status.map_or(true, |status| invoice.status == status)
            && self.customer_id.as_ref().map_or(true, |id| &invoice.customer_id == id)
    }
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        self.totals.total
    }
}

/// Document number `PPPP-NNNNNNNN`.
pub fn invoice_number(point_of_sale: u32, sequence: u64) -> String {
    format!("{:04}-{:08}", point_of_sale, sequence)
}
