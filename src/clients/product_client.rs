use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Category, PriceList, Product, ProductCreate, ProductPatch, StockStatus};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, product), fields(code = %product.code))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.create(product).await
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Lists products, optionally narrowed to a category and a stock status.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<Category>,
        stock_status: Option<StockStatus>,
    ) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner
            .list(move |product: &Product| {
                category.map_or(true, |c| product.category == c)
                    && stock_status.map_or(true, |s| product.stock_status() == s)
            })
            .await
    }

    /// Unit price of a product for the given price list.
    #[instrument(skip(self))]
    pub async fn price_for(&self, id: String, list: PriceList) -> Result<rust_decimal::Decimal, ProductError> {
        let product = self.inner.get(id.clone()).await?.ok_or(ProductError::NotFound(id))?;
        Ok(product.price_for(list))
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` units out of stock, returning the remaining level.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::ReserveStock(left) => Ok(left),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::ReleaseStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
