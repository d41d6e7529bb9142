use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::actor_framework::ResourceActor;
use crate::clients::{BillingClient, CustomerClient, OrderClient, ProductClient};
use crate::domain::{invoice_number, Collection, Customer, Invoice, Order, Product};
use super::error::SystemError;
use super::seed::default_catalog;
use super::settings::Settings;

/// The running application: one actor per record type plus the clients
/// wired on top of them.
pub struct DeliverySystem {
    pub product_client: ProductClient,
    pub customer_client: CustomerClient,
    pub order_client: OrderClient,
    pub billing_client: BillingClient,
    handles: Vec<JoinHandle<()>>,
}

fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = AtomicU64::new(1);
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

impl DeliverySystem {
    /// Starts every actor. Must be called inside a tokio runtime.
    pub fn new(settings: &Settings) -> Self {
        let capacity = settings.channel_capacity;

        let (product_actor, product_inner) = ResourceActor::<Product>::new(capacity, sequential_ids("product"));
        let product_client = ProductClient::new(product_inner);
        let product_handle = tokio::spawn(product_actor.run());

        let (customer_actor, customer_inner) = ResourceActor::<Customer>::new(capacity, sequential_ids("customer"));
        let customer_client = CustomerClient::new(customer_inner);
        let customer_handle = tokio::spawn(customer_actor.run());

        let (order_actor, order_inner) = ResourceActor::<Order>::new(capacity, sequential_ids("order"));
        let order_client = OrderClient::new(order_inner, customer_client.clone(), product_client.clone());
        let order_handle = tokio::spawn(order_actor.run());

        let (collection_actor, collection_inner) =
            ResourceActor::<Collection>::new(capacity, sequential_ids("collection"));
        let collection_handle = tokio::spawn(collection_actor.run());

        let point_of_sale = settings.point_of_sale;
        let invoice_seq = AtomicU64::new(1);
        let next_invoice = move || invoice_number(point_of_sale, invoice_seq.fetch_add(1, Ordering::SeqCst));
        let (invoice_actor, invoice_inner) = ResourceActor::<Invoice>::new(capacity, next_invoice);
        let invoice_handle = tokio::spawn(invoice_actor.run());

        let billing_client = BillingClient::new(
            collection_inner,
            invoice_inner,
            order_client.clone(),
            customer_client.clone(),
            settings.vat_rate_percent,
        );

        info!(capacity, point_of_sale, "Delivery system started");
        Self {
            product_client,
            customer_client,
            order_client,
            billing_client,
            handles: vec![product_handle, customer_handle, order_handle, collection_handle, invoice_handle],
        }
    }

    /// Loads the default product catalog, returning the new product ids.
    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> Result<Vec<String>, SystemError> {
        let mut ids = Vec::new();
        for product in default_catalog() {
            ids.push(self.product_client.create_product(product).await?);
        }
        info!(count = ids.len(), "Catalog seeded");
        Ok(ids)
    }

    /// Drops every client so the actors see their channels close, then
    /// waits for each task to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self {
            product_client,
            customer_client,
            order_client,
            billing_client,
            handles,
        } = self;
        drop(billing_client);
        drop(order_client);
        drop(customer_client);
        drop(product_client);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
