use chrono::Utc;
use tracing::{error, info, warn, Instrument};

use delivery_desk::app_system::{setup_tracing, DeliverySystem, Settings, SystemError};
use delivery_desk::domain::{
    CustomerCreate, CustomerKind, LineItemDraft, OrderDraft, PaymentInput, PaymentMethod, PriceList,
    VatCondition, Zone,
};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let settings = Settings::load()?;
    setup_tracing(&settings.log_level);

    info!("Starting delivery desk");
    let system = DeliverySystem::new(&settings);
    let products = system.seed_catalog().await?;
    let today = Utc::now().date_naive();

    // A registered VAT payer on list A
    let bar = CustomerCreate::new("Bar El Puerto", CustomerKind::Bar, Zone::Sur, PriceList::A)
        .with_contact("011-4567-8901", "compras@elpuerto.com.ar")
        .with_fiscal_data("El Puerto SRL", "30-71234567-1", VatCondition::RegisteredPayer, "Av. Pavón 1200");
    let (zone, price_list) = (bar.zone, bar.price_list);
    let bar_id = system.customer_client.create_customer(bar).await?;
    info!(customer_id = %bar_id, zone = zone.name(), price_list = price_list.label(), "Customer created");

    let span = tracing::info_span!("order_processing", customer_id = %bar_id);
    let result = async {
        let draft = OrderDraft::new(bar_id.clone(), today)
            .item(LineItemDraft::new(products[0].clone(), 2.0))
            .item(LineItemDraft::new(products[3].clone(), 1.0))
            .discount(10.0);
        let order_id = system.order_client.create_order(draft).await?;
        let totals = system.order_client.order_totals(order_id.clone()).await?;
        info!(order_id = %order_id, subtotal = %totals.subtotal, discount = %totals.discount, total = %totals.total, "Order priced");

        // The customer adds a petaca at a negotiated price
        let edited = vec![
            LineItemDraft::new(products[0].clone(), 2.0),
            LineItemDraft::new(products[3].clone(), 1.0),
            LineItemDraft::new(products[6].clone(), 1.0).at_price(1400.0),
        ];
        let totals = system.order_client.replace_items(order_id.clone(), edited).await?;
        info!(total = %totals.total, "Order edited");

        let receipt = system
            .billing_client
            .record_payment(order_id, PaymentInput::new(PaymentMethod::Cash, 5000.0))
            .await?;
        info!(status = ?receipt.status, change = %receipt.change, "Cash collected");
        if let Some(invoice) = receipt.invoice {
            info!(number = %invoice.number, kind = ?invoice.kind, total = %invoice.total(), net = %invoice.vat.net, vat = %invoice.vat.vat, "Invoice issued");
        }
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await;
    if let Err(e) = result {
        error!(error = %e, "Order processing failed");
    }

    // A kiosk without fiscal data that pays nothing on delivery
    let kiosk = CustomerCreate::new("Kiosco Defensa", CustomerKind::Kiosk, Zone::SanTelmo, PriceList::B);
    let kiosk_id = system.customer_client.create_customer(kiosk).await?;

    let span = tracing::info_span!("account_sale", customer_id = %kiosk_id);
    let result = async {
        let draft = OrderDraft::new(kiosk_id.clone(), today).item(LineItemDraft::new(products[1].clone(), 6.0));
        let order_id = system.order_client.create_order(draft).await?;
        let receipt = system
            .billing_client
            .record_payment(order_id, PaymentInput::new(PaymentMethod::Cash, 0.0))
            .await?;
        warn!(charged = %receipt.charged_to_account, status = ?receipt.status, "Delivered on account");
        if let Some(customer) = system.customer_client.get_customer(kiosk_id.clone()).await? {
            info!(balance = %customer.balance, "Current account updated");
        }
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await;
    if let Err(e) = result {
        error!(error = %e, "Account sale failed");
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
