use rust_decimal::Decimal;

/// Current-account operations on a customer.
#[derive(Debug, Clone)]
pub enum CustomerAction {
    /// Adds an unpaid amount to the customer's balance.
    ChargeAccount(Decimal),
    /// Applies a payment against the balance.
    SettleAccount(Decimal),
}

/// Both actions answer with the resulting balance.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    Balance(Decimal),
}
