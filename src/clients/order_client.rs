use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{CustomerClient, ProductClient};
use crate::domain::{
    Customer, DeliveryStatus, LineItemDraft, Order, OrderCreate, OrderDraft, OrderFilter, OrderPatch,
    PaymentMethod, PriceList,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, PaymentApplication};
use crate::pricing::{validate_price, validate_quantity, DiscountPercent, LineItem, OrderTotals};

/// Client for interacting with the Order actor.
///
/// This client handles the orchestration around orders: it validates the
/// customer and every product, prices lines from the customer's price list and
/// keeps catalog stock in step with the order's quantities.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    customer_client: CustomerClient,
    product_client: ProductClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        customer_client: CustomerClient,
        product_client: ProductClient,
    ) -> Self {
        Self {
            inner,
            customer_client,
            product_client,
        }
    }

    #[instrument(skip(self, draft), fields(customer_id = %draft.customer_id, lines = draft.items.len()))]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<String, OrderError> {
        info!("Processing create_order request");

        // Step 1: Validate customer
        let customer = self.validate_customer(&draft.customer_id).await?;

        // Step 2: Validate pricing input and resolve catalog data
        let discount = DiscountPercent::try_from(draft.discount_percent)?;
        let items = self.resolve_items(&draft.items, customer.price_list).await?;

        // Step 3: Reserve stock
        self.adjust_stock(&[], &items).await?;
        info!("Stock reserved successfully");

        // Step 4: Create order in ResourceActor
        let params = OrderCreate {
            customer_id: draft.customer_id,
            zone: customer.zone,
            driver_id: draft.driver_id,
            delivery_date: draft.delivery_date,
            kind: draft.kind,
            items: items.clone(),
            discount,
            notes: draft.notes,
        };
        match self.inner.create(params).await {
            Ok(id) => {
                info!(order_id = %id, "Order created successfully");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Order creation failed, releasing stock");
                self.release_all(&items).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        self.inner.list(move |order: &Order| filter.matches(order)).await
    }

    #[instrument(skip(self))]
    pub async fn order_totals(&self, id: String) -> Result<OrderTotals, OrderError> {
        let order = self.inner.get(id.clone()).await?.ok_or(OrderError::NotFound(id))?;
        Ok(order.totals())
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: String, patch: OrderPatch) -> Result<Order, OrderError> {
        self.inner.update(id, patch).await
    }

    /// Replaces the order's lines and returns the recomputed totals.
    ///
    /// Stock is reserved or released by the difference between the old and
    /// new quantities of each product.
    #[instrument(skip(self, drafts), fields(lines = drafts.len()))]
    pub async fn replace_items(&self, id: String, drafts: Vec<LineItemDraft>) -> Result<OrderTotals, OrderError> {
        let order = self.inner.get(id.clone()).await?.ok_or_else(|| OrderError::NotFound(id.clone()))?;
        let customer = self.validate_customer(&order.customer_id).await?;
        let items = self.resolve_items(&drafts, customer.price_list).await?;

        self.adjust_stock(&order.items, &items).await?;
        match self.perform(id, OrderAction::ReplaceItems(items.clone())).await {
            Ok(totals) => {
                info!(total = %totals.total, "Order items replaced");
                Ok(totals)
            }
            Err(e) => {
                warn!(error = %e, "Item replacement rejected, restoring stock");
                if let Err(restore) = self.adjust_stock(&items, &order.items).await {
                    error!(error = %restore, "Stock restore failed");
                }
                Err(e)
            }
        }
    }

    /// Validates a raw discount percentage and applies it.
    #[instrument(skip(self))]
    pub async fn set_discount(&self, id: String, percent: f64) -> Result<OrderTotals, OrderError> {
        let discount = DiscountPercent::try_from(percent)?;
        self.perform(id, OrderAction::SetDiscount(discount)).await
    }

    /// Applies a payment against what the order still owes. The order actor
    /// checks and records it in one step, so concurrent payments cannot both
    /// settle the same balance.
    #[instrument(skip(self))]
    pub async fn apply_payment(
        &self,
        id: String,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<PaymentApplication, OrderError> {
        match self.inner.perform_action(id, OrderAction::ApplyPayment { method, amount }).await? {
            OrderActionResult::Payment(application) => {
                debug!(applied = %application.applied, status = ?application.status, "Payment applied");
                Ok(application)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn reverse_payment(&self, id: String, application: PaymentApplication) -> Result<(), OrderError> {
        self.inner.perform_action(id, OrderAction::ReversePayment(application)).await?;
        warn!(applied = %application.applied, "Payment reversed");
        Ok(())
    }

    /// Marks the order as invoiced. Fails with `AlreadyInvoiced` when another
    /// document holds the claim.
    #[instrument(skip(self))]
    pub async fn claim_invoice(&self, id: String) -> Result<(), OrderError> {
        self.inner.perform_action(id, OrderAction::ClaimInvoice).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn release_invoice(&self, id: String) -> Result<(), OrderError> {
        self.inner.perform_action(id, OrderAction::ReleaseInvoice).await?;
        Ok(())
    }

    /// Cancels an order and returns its units to stock. Orders with recorded
    /// payments are rejected with `HasPayments`.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: String) -> Result<Order, OrderError> {
        let order = self.inner.get(id.clone()).await?.ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if order.status == DeliveryStatus::Cancelled {
            return Ok(order);
        }
        let patch = OrderPatch {
            status: Some(DeliveryStatus::Cancelled),
            ..Default::default()
        };
        let cancelled = self.inner.update(id, patch).await?;
        self.release_all(&order.items).await;
        info!("Order cancelled");
        Ok(cancelled)
    }

    async fn perform(&self, id: String, action: OrderAction) -> Result<OrderTotals, OrderError> {
        match self.inner.perform_action(id, action).await? {
            OrderActionResult::Totals(totals) => Ok(totals),
            other => Err(unexpected(other)),
        }
    }

    async fn validate_customer(&self, customer_id: &str) -> Result<Customer, OrderError> {
        match self.customer_client.get_customer(customer_id.to_string()).await {
            Ok(Some(customer)) => {
                info!(customer_name = %customer.name, "Customer validation successful");
                Ok(customer)
            }
            Ok(None) => {
                error!("Customer not found");
                Err(OrderError::InvalidCustomer(customer_id.to_string()))
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                Err(OrderError::InvalidCustomer(format!("Customer validation failed: {}", e)))
            }
        }
    }

    /// Turns raw lines into priced items. Lines without a price take the
    /// catalog price for `price_list`.
    async fn resolve_items(&self, drafts: &[LineItemDraft], price_list: PriceList) -> Result<Vec<LineItem>, OrderError> {
        let mut items = Vec::with_capacity(drafts.len());
        for (line, draft) in drafts.iter().enumerate() {
            let quantity = validate_quantity(line, draft.quantity)?;
            let explicit_price = draft.price_per_unit.map(|raw| validate_price(line, raw)).transpose()?;

            let product = match self.product_client.get_product(draft.product_id.clone()).await {
                Ok(Some(product)) => product,
                Ok(None) => {
                    error!(product_id = %draft.product_id, "Product not found");
                    return Err(OrderError::InvalidProduct(draft.product_id.clone()));
                }
                Err(e) => {
                    error!(error = %e, "Product validation failed");
                    return Err(OrderError::InvalidProduct(format!("Product validation failed: {}", e)));
                }
            };

            let price = explicit_price.unwrap_or_else(|| product.price_for(price_list));
            items.push(LineItem::new(product.id, product.name, quantity, price, price_list));
        }
        Ok(items)
    }

    /// Moves stock by the per-product difference between `before` and `after`.
    /// A failed reservation undoes the ones already made.
    async fn adjust_stock(&self, before: &[LineItem], after: &[LineItem]) -> Result<(), OrderError> {
        let mut deltas: BTreeMap<&str, i64> = BTreeMap::new();
        for item in before {
            *deltas.entry(item.product_id.as_str()).or_default() -= i64::from(item.quantity);
        }
        for item in after {
            *deltas.entry(item.product_id.as_str()).or_default() += i64::from(item.quantity);
        }

        let mut reserved: Vec<(&str, u32)> = Vec::new();
        for (&product_id, &delta) in deltas.iter().filter(|(_, d)| **d > 0) {
            let quantity = u32::try_from(delta).unwrap_or(u32::MAX);
            if let Err(e) = self.product_client.reserve_stock(product_id.to_string(), quantity).await {
                error!(error = %e, "Stock reservation failed");
                for (done_id, done_qty) in reserved {
                    self.release(done_id, done_qty).await;
                }
                return Err(OrderError::InsufficientStock(format!("Stock reservation failed: {}", e)));
            }
            reserved.push((product_id, quantity));
        }

        for (&product_id, &delta) in deltas.iter().filter(|(_, d)| **d < 0) {
            let quantity = u32::try_from(-delta).unwrap_or(u32::MAX);
            self.release(product_id, quantity).await;
        }
        Ok(())
    }

    async fn release_all(&self, items: &[LineItem]) {
        for item in items {
            self.release(&item.product_id, item.quantity).await;
        }
    }

    async fn release(&self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Err(e) = self.product_client.release_stock(product_id.to_string(), quantity).await {
            warn!(product_id, error = %e, "Stock release failed");
        }
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result: {:?}", result))
}

impl_client_methods!(OrderClient, Order, OrderError, order);
