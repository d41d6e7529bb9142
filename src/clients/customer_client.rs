use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::domain::{Customer, CustomerCreate, CustomerKind, CustomerPatch, Zone};

/// Client for interacting with the customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl_basic_client!(CustomerClient, Customer, CustomerError, customer);

impl CustomerClient {
    #[instrument(skip(self, customer), fields(customer_name = %customer.name, zone = ?customer.zone))]
    pub async fn create_customer(&self, customer: CustomerCreate) -> Result<String, CustomerError> {
        debug!("Sending request");
        self.inner.create(customer).await
    }

    #[instrument(skip(self))]
    pub async fn update_customer(&self, id: String, patch: CustomerPatch) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Lists customers by zone and kind; `search` matches the name or
    /// business name, ignoring case.
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        zone: Option<Zone>,
        kind: Option<CustomerKind>,
        search: Option<String>,
    ) -> Result<Vec<Customer>, CustomerError> {
        debug!("Sending request");
        let needle = search.map(|s| s.to_lowercase());
        self.inner
            .list(move |customer: &Customer| {
                zone.map_or(true, |z| customer.zone == z)
                    && kind.map_or(true, |k| customer.kind == k)
                    && needle.as_ref().map_or(true, |n| {
                        customer.name.to_lowercase().contains(n)
                            || customer
                                .business_name
                                .as_ref()
                                .is_some_and(|b| b.to_lowercase().contains(n))
                    })
            })
            .await
    }

    /// Adds an unpaid amount to the current account, returning the new balance.
    #[instrument(skip(self))]
    pub async fn charge_account(&self, id: String, amount: Decimal) -> Result<Decimal, CustomerError> {
        debug!("Sending request");
        let CustomerActionResult::Balance(balance) =
            self.inner.perform_action(id, CustomerAction::ChargeAccount(amount)).await?;
        Ok(balance)
    }

    #[instrument(skip(self))]
    pub async fn settle_account(&self, id: String, amount: Decimal) -> Result<Decimal, CustomerError> {
        debug!("Sending request");
        let CustomerActionResult::Balance(balance) =
            self.inner.perform_action(id, CustomerAction::SettleAccount(amount)).await?;
        Ok(balance)
    }
}
