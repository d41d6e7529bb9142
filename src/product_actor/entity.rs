use crate::actor_framework::Entity;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{PriceList, Product, ProductCreate, ProductPatch};
use crate::pricing::{is_valid_unit_price, MAX_UNIT_PRICE};
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects products without a code or name, and prices that are
    /// negative or above `MAX_UNIT_PRICE`.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        if params.code.trim().is_empty() || params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("code and name are required".to_string()));
        }
        check_prices(&params.code, &params.prices)?;
        Ok(Self {
            id,
            code: params.code,
            name: params.name,
            category: params.category,
            unit: params.unit,
            pack_size: params.pack_size,
            prices: params.prices,
            stock: params.stock,
            min_stock: params.min_stock,
        })
    }

    /// Updates prices and/or stock levels.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(prices) = &patch.prices {
            check_prices(&self.code, prices)?;
        }
        if let Some(prices) = patch.prices {
            self.prices = prices;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
        }
        Ok(())
    }

    /// Handles stock actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `ReserveStock(amount)`: Decrements stock, returns what is left
    /// - `ReleaseStock(amount)`: Increments stock, returns the new level
    ///
    /// # Errors
    /// Returns an error if attempting to reserve more stock than available.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(amount) => {
                if self.stock < amount {
                    return Err(ProductError::InsufficientStock {
                        product_id: self.id.clone(),
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                Ok(ProductActionResult::ReserveStock(self.stock))
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
        }
    }
}

fn check_prices(code: &str, prices: &BTreeMap<PriceList, Decimal>) -> Result<(), ProductError> {
    match prices.iter().find(|(_, price)| !is_valid_unit_price(**price)) {
        Some((list, price)) => Err(ProductError::ValidationError(format!(
            "price {} on list {} for {} must be between 0 and {}",
            price,
            list.label(),
            code,
            MAX_UNIT_PRICE
        ))),
        None => Ok(()),
    }
}
