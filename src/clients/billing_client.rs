use chrono::Utc;
use rust_decimal::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::billing_actor::{BillingError, CollectionAction, InvoiceAction};
use crate::clients::{CustomerClient, OrderClient};
use crate::domain::{
    Collection, CollectionCreate, CollectionFilter, CollectionStatus, Invoice, InvoiceCreate, InvoiceFilter,
    InvoiceKind, InvoiceStatus, PaymentInput, PaymentMethod, PaymentStatus,
};
use crate::order_actor::{OrderError, PaymentApplication};
use crate::pricing::{vat_breakdown, PRICE_SCALE};

/// Outcome of recording a payment against an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub collection_id: String,
    pub method: PaymentMethod,
    /// Amount applied to the order.
    pub applied: Decimal,
    pub change: Decimal,
    /// Portion moved to the customer's current account.
    pub charged_to_account: Decimal,
    pub status: PaymentStatus,
    pub invoice: Option<Invoice>,
}

/// Client for collections and fiscal documents.
///
/// Recording a payment touches three services: the order applies the amount
/// and updates its payment status, unpaid amounts are charged to the
/// customer's current account, and the collection is stored here.
#[derive(Clone)]
pub struct BillingClient {
    collections: ResourceClient<Collection>,
    invoices: ResourceClient<Invoice>,
    order_client: OrderClient,
    customer_client: CustomerClient,
    vat_rate: u32,
}

impl BillingClient {
    pub fn new(
        collections: ResourceClient<Collection>,
        invoices: ResourceClient<Invoice>,
        order_client: OrderClient,
        customer_client: CustomerClient,
        vat_rate: u32,
    ) -> Self {
        Self {
            collections,
            invoices,
            order_client,
            customer_client,
            vat_rate,
        }
    }

    /// Records a payment against an order.
    ///
    /// The order actor applies the amount atomically, so two payments racing
    /// for the same balance cannot both succeed. If the account charge or the
    /// collection cannot be stored afterwards, the application is reversed.
    #[instrument(skip(self, input), fields(method = ?input.method, amount = input.amount))]
    pub async fn record_payment(&self, order_id: String, input: PaymentInput) -> Result<PaymentReceipt, BillingError> {
        info!("Processing record_payment request");
        let amount = validate_amount(input.amount)?;

        let order = self
            .order_client
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;

        // Step 1: Apply the payment to the order
        let application = self
            .order_client
            .apply_payment(order_id.clone(), input.method, amount)
            .await
            .map_err(|e| {
                warn!(error = %e, "Payment rejected by order");
                e
            })?;

        // Step 2: Charge the customer's current account
        let charged_to_account = application.charged_to_account();
        if !charged_to_account.is_zero() {
            match self.customer_client.charge_account(order.customer_id.clone(), charged_to_account).await {
                Ok(balance) => info!(charged = %charged_to_account, %balance, "Charged to current account"),
                Err(e) => {
                    error!(error = %e, "Account charge failed, reversing payment");
                    self.reverse(&order_id, application).await;
                    return Err(e.into());
                }
            }
        }

        // Step 3: Store the collection
        let created = self
            .collections
            .create(CollectionCreate {
                order_id: order_id.clone(),
                customer_id: order.customer_id.clone(),
                zone: order.zone,
                method: application.method,
                amount: application.applied,
                change: application.change,
                receipt: input.receipt,
            })
            .await;
        let collection_id = match created {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Collection could not be stored, reversing payment");
                if !charged_to_account.is_zero() {
                    if let Err(settle) = self.customer_client.settle_account(order.customer_id, charged_to_account).await {
                        error!(error = %settle, "Account charge could not be undone");
                    }
                }
                self.reverse(&order_id, application).await;
                return Err(e);
            }
        };
        info!(collection_id = %collection_id, status = ?application.status, change = %application.change, "Payment recorded");

        // Step 4: A fully paid order gets its fiscal document
        let invoice = if application.status == PaymentStatus::Paid {
            Some(self.issue_invoice(order_id).await?)
        } else {
            None
        };

        Ok(PaymentReceipt {
            collection_id,
            method: application.method,
            applied: application.applied,
            change: application.change,
            charged_to_account,
            status: application.status,
            invoice,
        })
    }

    async fn reverse(&self, order_id: &str, application: PaymentApplication) {
        if let Err(e) = self.order_client.reverse_payment(order_id.to_string(), application).await {
            error!(error = %e, "Payment reversal failed");
        }
    }

    /// Issues the fiscal document for an order: invoice A or B when the
    /// customer's fiscal data is complete, a delivery note otherwise.
    ///
    /// The order is claimed first so only one document can be issued for it.
    #[instrument(skip(self))]
    pub async fn issue_invoice(&self, order_id: String) -> Result<Invoice, BillingError> {
        self.order_client.claim_invoice(order_id.clone()).await?;
        match self.create_invoice(order_id.clone()).await {
            Ok(invoice) => Ok(invoice),
            Err(e) => {
                error!(error = %e, "Invoice could not be issued, releasing order");
                if let Err(release) = self.order_client.release_invoice(order_id).await {
                    error!(error = %release, "Invoice claim release failed");
                }
                Err(e)
            }
        }
    }

    async fn create_invoice(&self, order_id: String) -> Result<Invoice, BillingError> {
        let order = self
            .order_client
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;

        let customer = self
            .customer_client
            .get_customer(order.customer_id.clone())
            .await?
            .ok_or_else(|| OrderError::InvalidCustomer(order.customer_id.clone()))?;
        let kind = InvoiceKind::for_customer(&customer);
        if kind == InvoiceKind::DeliveryNote {
            warn!(missing = ?customer.missing_fiscal_fields(), "Incomplete fiscal data, issuing delivery note");
        }

        let totals = order.totals();
        let number = self
            .invoices
            .create(InvoiceCreate {
                order_id,
                customer_id: customer.id,
                kind,
                totals,
                vat: vat_breakdown(totals.total, self.vat_rate),
                issued_on: Utc::now().date_naive(),
            })
            .await?;
        info!(invoice_number = %number, ?kind, "Invoice issued");

        self.get_invoice(number.clone())
            .await?
            .ok_or(BillingError::NotFound(number))
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, number: String) -> Result<Option<Invoice>, BillingError> {
        debug!("Sending request");
        self.invoices.get(number).await
    }

    #[instrument(skip(self))]
    pub async fn list_invoices(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, BillingError> {
        self.invoices.list(move |invoice: &Invoice| filter.matches(invoice)).await
    }

    /// Voids an invoice and frees its order for a new document.
    #[instrument(skip(self))]
    pub async fn void_invoice(&self, number: String) -> Result<InvoiceStatus, BillingError> {
        let status = self.invoices.perform_action(number.clone(), InvoiceAction::Void).await?;
        if let Some(invoice) = self.invoices.get(number).await? {
            self.order_client.release_invoice(invoice.order_id).await?;
        }
        info!("Invoice voided");
        Ok(status)
    }

    #[instrument(skip(self))]
    pub async fn get_collection(&self, id: String) -> Result<Option<Collection>, BillingError> {
        debug!("Sending request");
        self.collections.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_collections(&self, filter: CollectionFilter) -> Result<Vec<Collection>, BillingError> {
        self.collections.list(move |collection: &Collection| filter.matches(collection)).await
    }

    #[instrument(skip(self))]
    pub async fn collections_for_order(&self, order_id: String) -> Result<Vec<Collection>, BillingError> {
        self.collections.list(move |collection: &Collection| collection.order_id == order_id).await
    }

    #[instrument(skip(self))]
    pub async fn verify_collection(&self, id: String) -> Result<CollectionStatus, BillingError> {
        self.collections.perform_action(id, CollectionAction::Verify).await
    }
}

/// Raw payment amounts must be finite and non-negative.
fn validate_amount(value: f64) -> Result<Decimal, BillingError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BillingError::InvalidAmount(value));
    }
    let amount = Decimal::from_f64(value).ok_or(BillingError::InvalidAmount(value))?;
    Ok(amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}
