use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PriceList;
use super::validation::DiscountPercent;

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Decimal,
    pub price_list: PriceList,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        price_per_unit: Decimal,
        price_list: PriceList,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            price_per_unit,
            price_list,
        }
    }

    /// `quantity × price_per_unit`, recomputed on every call.
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price_per_unit
    }
}

/// Derived order amounts. Never stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Discount amount for a subtotal. A zero percentage yields exactly zero.
pub fn calculate_discount(subtotal: Decimal, discount: DiscountPercent) -> Decimal {
    if discount.is_zero() {
        return Decimal::ZERO;
    }
    subtotal * discount.value() / Decimal::ONE_HUNDRED
}

/// Compute subtotal, discount and total for a list of line items.
///
/// # Arguments
/// * `items` - Validated line items, in order
/// * `discount` - Uniform discount applied to the sum of the item subtotals
///
/// # Notes
/// The function is pure: identical inputs always produce identical totals.
/// Amounts are exact decimals, so `total == subtotal - discount` holds without
/// tolerance and a 100% discount yields a total of exactly zero.
pub fn compute_totals(items: &[LineItem], discount: DiscountPercent) -> OrderTotals {
    let subtotal: Decimal = items.iter().map(LineItem::subtotal).sum();
    let discount = calculate_discount(subtotal, discount);

    OrderTotals {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}
