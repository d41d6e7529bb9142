use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{invalid_contact_field, Customer, CustomerCreate, CustomerPatch};
use super::actions::{CustomerAction, CustomerActionResult};
use super::error::CustomerError;

impl Entity for Customer {
    type Id = String;
    type CreateParams = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Error = CustomerError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Customer with an empty current account.
    ///
    /// # Errors
    /// Rejects an empty name and malformed email, phone or CUIT.
    fn from_create_params(id: String, params: CustomerCreate) -> Result<Self, CustomerError> {
        if params.name.trim().is_empty() {
            return Err(CustomerError::ValidationError("name is required".to_string()));
        }
        if let Some(problem) = invalid_contact_field(
            params.email.as_deref(),
            params.phone.as_deref(),
            params.cuit.as_deref(),
        ) {
            return Err(CustomerError::ValidationError(problem));
        }
        Ok(Self {
            id,
            name: params.name,
            kind: params.kind,
            zone: params.zone,
            price_list: params.price_list,
            phone: params.phone,
            email: params.email,
            address: params.address,
            business_name: params.business_name,
            cuit: params.cuit,
            vat_condition: params.vat_condition,
            balance: Decimal::ZERO,
        })
    }

    /// Updates contact and fiscal data. Validation runs before any field changes.
    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), CustomerError> {
        if let Some(problem) = invalid_contact_field(
            patch.email.as_deref(),
            patch.phone.as_deref(),
            patch.cuit.as_deref(),
        ) {
            return Err(CustomerError::ValidationError(problem));
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price_list) = patch.price_list {
            self.price_list = price_list;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
        if patch.business_name.is_some() {
            self.business_name = patch.business_name;
        }
        if patch.cuit.is_some() {
            self.cuit = patch.cuit;
        }
        if patch.vat_condition.is_some() {
            self.vat_condition = patch.vat_condition;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CustomerAction) -> Result<CustomerActionResult, CustomerError> {
        match action {
            CustomerAction::ChargeAccount(amount) => {
                if amount.is_sign_negative() {
                    return Err(CustomerError::InvalidAmount(amount));
                }
                self.balance = self
                    .balance
                    .checked_add(amount)
                    .ok_or(CustomerError::InvalidAmount(amount))?;
            }
            CustomerAction::SettleAccount(amount) => {
                if amount.is_sign_negative() || amount > self.balance {
                    return Err(CustomerError::InvalidAmount(amount));
                }
                self.balance -= amount;
            }
        }
        Ok(CustomerActionResult::Balance(self.balance))
    }
}
