use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PriceList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    EnergyDrinks,
    SoftDrinks,
    Water,
    Spirits,
    Liqueurs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Ok,
    Low,
    Critical,
}

impl StockStatus {
    /// `Critical` at or below half the minimum, `Low` at or below the minimum.
    pub fn classify(stock: u32, min_stock: u32) -> Self {
        if u64::from(stock) * 2 <= u64::from(min_stock) {
            StockStatus::Critical
        } else if stock <= min_stock {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

/// A catalog product with one price per price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: Category,
    pub unit: String,
    pub pack_size: u32,
    pub prices: BTreeMap<PriceList, Decimal>,
    pub stock: u32,
    pub min_stock: u32,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub code: String,
    pub name: String,
    pub category: Category,
    pub unit: String,
    pub pack_size: u32,
    pub prices: BTreeMap<PriceList, Decimal>,
    pub stock: u32,
    pub min_stock: u32,
}

/// Payload for updating prices or stock levels.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub prices: Option<BTreeMap<PriceList, Decimal>>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
}

impl Product {
    /// Unit price for a list, falling back to list A and then to zero.
    pub fn price_for(&self, list: PriceList) -> Decimal {
        self.prices
            .get(&list)
            .or_else(|| self.prices.get(&PriceList::A))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock, self.min_stock)
    }
}

impl ProductCreate {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        unit: impl Into<String>,
        pack_size: u32,
        stock: u32,
        min_stock: u32,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            unit: unit.into(),
            pack_size,
            prices: BTreeMap::new(),
            stock,
            min_stock,
        }
    }

    pub fn with_price(mut self, list: PriceList, price: Decimal) -> Self {
        self.prices.insert(list, price);
        self
    }
}
