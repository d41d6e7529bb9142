use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{DeliveryStatus, Order, OrderCreate, OrderKind, OrderPatch, PaymentMethod, PaymentStatus};
use crate::pricing::{change_due, LineItem};
use super::actions::{OrderAction, OrderActionResult, PaymentApplication};
use super::error::OrderError;

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Order from already validated parameters.
    ///
    /// # Notes
    /// Consignment orders start in the `Consignment` delivery status,
    /// everything else starts as `Pending`.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        check_items(&params.items)?;
        let status = match params.kind {
            OrderKind::Normal => DeliveryStatus::Pending,
            OrderKind::Consignment => DeliveryStatus::Consignment,
        };
        Ok(Self {
            id,
            customer_id: params.customer_id,
            zone: params.zone,
            driver_id: params.driver_id,
            delivery_date: params.delivery_date,
            kind: params.kind,
            items: params.items,
            discount: params.discount,
            status,
            payment_status: PaymentStatus::Pending,
            settled: Decimal::ZERO,
            paid: Decimal::ZERO,
            invoiced: false,
            notes: params.notes,
            created_at: Utc::now(),
        })
    }

    /// Orders with recorded payments cannot be cancelled.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        if patch.status == Some(DeliveryStatus::Cancelled) && self.has_payments() {
            return Err(OrderError::HasPayments(self.id.clone()));
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.driver_id.is_some() {
            self.driver_id = patch.driver_id;
        }
        if let Some(date) = patch.delivery_date {
            self.delivery_date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        Ok(())
    }

    /// Cancelled orders cannot be repriced, paid or invoiced. Items and
    /// discount are frozen once any payment has been applied.
    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::ReplaceItems(items) => {
                self.ensure_editable()?;
                check_items(&items)?;
                self.items = items;
                Ok(OrderActionResult::Totals(self.totals()))
            }
            OrderAction::SetDiscount(discount) => {
                self.ensure_editable()?;
                self.discount = discount;
                Ok(OrderActionResult::Totals(self.totals()))
            }
            OrderAction::ApplyPayment { method, amount } => {
                self.ensure_open()?;
                self.apply_payment(method, amount).map(OrderActionResult::Payment)
            }
            OrderAction::ReversePayment(application) => {
                self.settled -= application.applied;
                if application.method != PaymentMethod::CurrentAccount {
                    self.paid -= application.applied;
                }
                self.payment_status = self.resolve_payment_status();
                Ok(OrderActionResult::Totals(self.totals()))
            }
            OrderAction::ClaimInvoice => {
                self.ensure_open()?;
                if self.invoiced {
                    return Err(OrderError::AlreadyInvoiced(self.id.clone()));
                }
                self.invoiced = true;
                Ok(OrderActionResult::Invoiced(true))
            }
            OrderAction::ReleaseInvoice => {
                self.invoiced = false;
                Ok(OrderActionResult::Invoiced(false))
            }
        }
    }
}

impl Order {
    fn ensure_open(&self) -> Result<(), OrderError> {
        if self.status == DeliveryStatus::Cancelled {
            return Err(OrderError::ValidationError(format!("order {} is cancelled", self.id)));
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), OrderError> {
        self.ensure_open()?;
        if self.has_payments() {
            return Err(OrderError::HasPayments(self.id.clone()));
        }
        Ok(())
    }

    fn resolve_payment_status(&self) -> PaymentStatus {
        if self.has_payments() {
            PaymentStatus::resolve(self.totals().total, self.paid)
        } else {
            PaymentStatus::Pending
        }
    }

    /// Cash may exceed what is owed and returns change; other methods may not.
    /// A zero amount, or the current-account method, charges everything
    /// outstanding to the customer.
    fn apply_payment(&mut self, method: PaymentMethod, amount: Decimal) -> Result<PaymentApplication, OrderError> {
        let outstanding = self.outstanding();
        if outstanding <= Decimal::ZERO {
            return Err(OrderError::AlreadySettled(self.id.clone()));
        }

        let (method, applied, change) = match method {
            PaymentMethod::CurrentAccount => (PaymentMethod::CurrentAccount, outstanding, Decimal::ZERO),
            _ if amount.is_zero() => (PaymentMethod::CurrentAccount, outstanding, Decimal::ZERO),
            PaymentMethod::Cash => (PaymentMethod::Cash, amount.min(outstanding), change_due(outstanding, amount)),
            other => {
                if amount > outstanding {
                    return Err(OrderError::Overpayment { outstanding, amount });
                }
                (other, amount, Decimal::ZERO)
            }
        };

        self.settled += applied;
        if method != PaymentMethod::CurrentAccount {
            self.paid += applied;
        }
        self.payment_status = self.resolve_payment_status();
        Ok(PaymentApplication {
            method,
            applied,
            change,
            status: self.payment_status,
        })
    }
}

/// An order needs at least one line and at least one unit.
fn check_items(items: &[LineItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::ValidationError("order has no items".to_string()));
    }
    if items.iter().all(|item| item.quantity == 0) {
        return Err(OrderError::ValidationError("order has no units".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::domain::{PriceList, Zone};
    use crate::pricing::DiscountPercent;

    /// 2 × 1200 + 1 × 800, no discount: 3200 owed.
    fn order() -> Order {
        let params = OrderCreate {
            customer_id: "customer_1".to_string(),
            zone: Zone::Sur,
            driver_id: None,
            delivery_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            kind: OrderKind::Normal,
            items: vec![
                LineItem::new("product_1", "Speed 250ml", 2, dec!(1200), PriceList::A),
                LineItem::new("product_4", "Agua BLOCK 500ml", 1, dec!(800), PriceList::A),
            ],
            discount: DiscountPercent::ZERO,
            notes: String::new(),
        };
        Order::from_create_params("order_1".to_string(), params).unwrap()
    }

    fn pay(order: &mut Order, method: PaymentMethod, amount: Decimal) -> Result<PaymentApplication, OrderError> {
        match order.handle_action(OrderAction::ApplyPayment { method, amount })? {
            OrderActionResult::Payment(application) => Ok(application),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_or_unitless_items_are_rejected() {
        let mut order = order();
        assert_eq!(
            order.handle_action(OrderAction::ReplaceItems(vec![])),
            Err(OrderError::ValidationError("order has no items".to_string()))
        );
        let unitless = vec![LineItem::new("product_1", "Speed 250ml", 0, dec!(1200), PriceList::A)];
        assert!(order.handle_action(OrderAction::ReplaceItems(unitless)).is_err());
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_transfer_cannot_exceed_outstanding() {
        let mut order = order();
        let first = pay(&mut order, PaymentMethod::Transfer, dec!(2400)).unwrap();
        assert_eq!(first.status, PaymentStatus::Partial);
        assert_eq!(
            pay(&mut order, PaymentMethod::Transfer, dec!(2400)),
            Err(OrderError::Overpayment { outstanding: dec!(800), amount: dec!(2400) })
        );
        assert_eq!(order.settled, dec!(2400));
    }

    #[test]
    fn test_cash_returns_change_and_settles() {
        let mut order = order();
        let application = pay(&mut order, PaymentMethod::Cash, dec!(5000)).unwrap();
        assert_eq!(application.applied, dec!(3200));
        assert_eq!(application.change, dec!(1800));
        assert_eq!(application.status, PaymentStatus::Paid);
        assert_eq!(pay(&mut order, PaymentMethod::Cash, dec!(1)), Err(OrderError::AlreadySettled("order_1".to_string())));
    }

    #[test]
    fn test_zero_amount_is_charged_to_account() {
        let mut order = order();
        let application = pay(&mut order, PaymentMethod::Card, dec!(0)).unwrap();
        assert_eq!(application.method, PaymentMethod::CurrentAccount);
        assert_eq!(application.charged_to_account(), dec!(3200));
        assert_eq!(application.status, PaymentStatus::Unpaid);
        assert_eq!(order.outstanding(), dec!(0));
    }

    #[test]
    fn test_payments_freeze_items_and_discount() {
        let mut order = order();
        pay(&mut order, PaymentMethod::Transfer, dec!(1000)).unwrap();

        let more = vec![LineItem::new("product_1", "Speed 250ml", 9, dec!(1200), PriceList::A)];
        assert_eq!(
            order.handle_action(OrderAction::ReplaceItems(more)),
            Err(OrderError::HasPayments("order_1".to_string()))
        );
        assert_eq!(
            order.handle_action(OrderAction::SetDiscount(DiscountPercent::new(dec!(50)).unwrap())),
            Err(OrderError::HasPayments("order_1".to_string()))
        );
        assert_eq!(order.totals().total, dec!(3200));

        let cancel = OrderPatch { status: Some(DeliveryStatus::Cancelled), ..Default::default() };
        assert_eq!(order.on_update(cancel), Err(OrderError::HasPayments("order_1".to_string())));
    }

    #[test]
    fn test_reverse_payment_restores_balance() {
        let mut order = order();
        let application = pay(&mut order, PaymentMethod::Transfer, dec!(3200)).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);

        order.handle_action(OrderAction::ReversePayment(application)).unwrap();
        assert_eq!(order.settled, dec!(0));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.outstanding(), dec!(3200));
    }

    #[test]
    fn test_invoice_claim_is_exclusive() {
        let mut order = order();
        assert_eq!(order.handle_action(OrderAction::ClaimInvoice), Ok(OrderActionResult::Invoiced(true)));
        assert_eq!(
            order.handle_action(OrderAction::ClaimInvoice),
            Err(OrderError::AlreadyInvoiced("order_1".to_string()))
        );
        order.handle_action(OrderAction::ReleaseInvoice).unwrap();
        assert!(order.handle_action(OrderAction::ClaimInvoice).is_ok());
    }
}
