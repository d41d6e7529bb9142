use rust_decimal::Decimal;

use crate::domain::{PaymentMethod, PaymentStatus};
use crate::pricing::{DiscountPercent, LineItem, OrderTotals};

/// Order edits and the payment bookkeeping that must happen atomically.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Replaces every line of the order with validated items.
    ReplaceItems(Vec<LineItem>),
    SetDiscount(DiscountPercent),
    /// Applies a payment against the outstanding amount.
    ApplyPayment { method: PaymentMethod, amount: Decimal },
    /// Undoes an application whose collection could not be stored.
    ReversePayment(PaymentApplication),
    /// Reserves the right to issue the order's fiscal document.
    ClaimInvoice,
    /// Frees the order for a new document after a void or a failed issue.
    ReleaseInvoice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    Totals(OrderTotals),
    Payment(PaymentApplication),
    Invoiced(bool),
}

/// How a payment was applied to an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentApplication {
    /// `CurrentAccount` when the amount was charged to the customer.
    pub method: PaymentMethod,
    pub applied: Decimal,
    pub change: Decimal,
    pub status: PaymentStatus,
}

impl PaymentApplication {
    pub fn charged_to_account(&self) -> Decimal {
        if self.method == PaymentMethod::CurrentAccount {
            self.applied
        } else {
            Decimal::ZERO
        }
    }
}
