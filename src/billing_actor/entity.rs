use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{
    Collection, CollectionCreate, CollectionStatus, Invoice, InvoiceCreate, InvoiceStatus,
};
use super::actions::{CollectionAction, InvoiceAction};
use super::error::BillingError;

impl Entity for Collection {
    type Id = String;
    type CreateParams = CollectionCreate;
    type Patch = ();
    type Action = CollectionAction;
    type ActionResult = CollectionStatus;
    type Error = BillingError;

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: CollectionCreate) -> Result<Self, BillingError> {
        Ok(Self {
            id,
            order_id: params.order_id,
            customer_id: params.customer_id,
            zone: params.zone,
            method: params.method,
            amount: params.amount,
            change: params.change,
            receipt: params.receipt,
            status: CollectionStatus::PendingVerification,
            recorded_at: Utc::now(),
        })
    }

    /// Collections are immutable once recorded.
    fn on_update(&mut self, _patch: ()) -> Result<(), BillingError> {
        Ok(())
    }

    fn handle_action(&mut self, action: CollectionAction) -> Result<CollectionStatus, BillingError> {
        match action {
            CollectionAction::Verify => self.status = CollectionStatus::Verified,
        }
        Ok(self.status)
    }
}

impl Entity for Invoice {
    type Id = String;
    type CreateParams = InvoiceCreate;
    type Patch = ();
    type Action = InvoiceAction;
    type ActionResult = InvoiceStatus;
    type Error = BillingError;

    fn id(&self) -> &String { &self.number }

    fn from_create_params(number: String, params: InvoiceCreate) -> Result<Self, BillingError> {
        Ok(Self {
            number,
            order_id: params.order_id,
            customer_id: params.customer_id,
            kind: params.kind,
            totals: params.totals,
            vat: params.vat,
            status: InvoiceStatus::Issued,
            issued_on: params.issued_on,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), BillingError> {
        Ok(())
    }

    fn handle_action(&mut self, action: InvoiceAction) -> Result<InvoiceStatus, BillingError> {
        match action {
            InvoiceAction::Void => {
                if self.status == InvoiceStatus::Voided {
                    return Err(BillingError::AlreadyVoided(self.number.clone()));
                }
                self.status = InvoiceStatus::Voided;
            }
        }
        Ok(self.status)
    }
}
