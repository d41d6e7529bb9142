//! Boundary validation for pricing input.
//!
//! Form fields arrive as raw `f64` values. They are turned into typed
//! [`LineItem`]s and a [`DiscountPercent`] here, before any totals are computed,
//! so a bad field surfaces as a [`PricingError`] naming the offending line.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceList;
use super::calculator::LineItem;

/// Decimal places kept for unit prices (minor currency unit).
pub const PRICE_SCALE: u32 = 2;
/// Decimal places kept for discount percentages.
pub const DISCOUNT_SCALE: u32 = 4;
/// Highest accepted unit price. With `u32` quantities and a percentage
/// discount, line and order arithmetic stays far inside `Decimal::MAX`.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Invalid quantity on line {line}: {value}")]
    InvalidQuantity { line: usize, value: f64 },
    #[error("Invalid price on line {line}: {value}")]
    InvalidPrice { line: usize, value: f64 },
    #[error("Invalid discount: {0} (expected 0 to 100)")]
    InvalidDiscount(f64),
}

/// A discount percentage known to lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, PricingError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PricingError::InvalidDiscount(value.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<f64> for DiscountPercent {
    type Error = PricingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PricingError::InvalidDiscount(value));
        }
        let decimal = Decimal::from_f64(value)
            .ok_or(PricingError::InvalidDiscount(value))?
            .round_dp(DISCOUNT_SCALE);
        Self::new(decimal).map_err(|_| PricingError::InvalidDiscount(value))
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = PricingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl std::fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// Validates a raw quantity field. Must be a whole, non-negative number.
pub fn validate_quantity(line: usize, value: f64) -> Result<u32, PricingError> {
    let invalid = || PricingError::InvalidQuantity { line, value };
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(invalid());
    }
    value.to_u32().ok_or_else(invalid)
}

/// Validates a raw unit price. Rounded to the minor currency unit and capped
/// at [`MAX_UNIT_PRICE`].
pub fn validate_price(line: usize, value: f64) -> Result<Decimal, PricingError> {
    let invalid = || PricingError::InvalidPrice { line, value };
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    let price = Decimal::from_f64(value)
        .ok_or_else(invalid)?
        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if !is_valid_unit_price(price) {
        return Err(invalid());
    }
    Ok(price)
}

/// Catalog and order prices must lie in `[0, MAX_UNIT_PRICE]`.
pub fn is_valid_unit_price(price: Decimal) -> bool {
    !price.is_sign_negative() && price <= MAX_UNIT_PRICE
}

/// Builds a typed line item from raw form fields.
pub fn validate_line_item(
    line: usize,
    product_id: impl Into<String>,
    product_name: impl Into<String>,
    quantity: f64,
    price_per_unit: f64,
    price_list: PriceList,
) -> Result<LineItem, PricingError> {
    let quantity = validate_quantity(line, quantity)?;
    let price_per_unit = validate_price(line, price_per_unit)?;
    Ok(LineItem::new(product_id, product_name, quantity, price_per_unit, price_list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_must_be_whole_and_non_negative() {
        assert_eq!(validate_quantity(0, 3.0), Ok(3));
        assert_eq!(validate_quantity(0, 0.0), Ok(0));
        assert_eq!(
            validate_quantity(2, -1.0),
            Err(PricingError::InvalidQuantity { line: 2, value: -1.0 })
        );
        assert!(validate_quantity(0, 1.5).is_err());
        assert!(validate_quantity(0, f64::INFINITY).is_err());
        assert!(validate_quantity(0, 1e12).is_err());
    }

    #[test]
    fn test_price_above_cap_is_rejected() {
        assert_eq!(validate_price(0, 1_000_000_000.0), Ok(MAX_UNIT_PRICE));
        assert_eq!(
            validate_price(3, 1_000_000_000.01),
            Err(PricingError::InvalidPrice { line: 3, value: 1_000_000_000.01 })
        );
        assert!(validate_price(0, 1e28).is_err());
        assert!(!is_valid_unit_price(dec!(-0.01)));
    }

    #[test]
    fn test_largest_order_fits_in_decimal() {
        let item = LineItem::new("product_1", "Speed 250ml", u32::MAX, MAX_UNIT_PRICE, PriceList::A);
        let items = vec![item; 1000];
        let discount = DiscountPercent::new(dec!(99.9999)).unwrap();
        let totals = crate::pricing::compute_totals(&items, discount);
        assert_eq!(totals.subtotal, Decimal::from(u32::MAX) * MAX_UNIT_PRICE * dec!(1000));
        assert_eq!(totals.total, totals.subtotal - totals.discount);
    }

    #[test]
    fn test_nan_quantity_is_rejected() {
        let err = validate_quantity(4, f64::NAN).unwrap_err();
        assert!(matches!(err, PricingError::InvalidQuantity { line: 4, .. }));
    }

    #[test]
    fn test_price_is_rounded_to_cents() {
        assert_eq!(validate_price(0, 1200.0), Ok(dec!(1200)));
        assert_eq!(validate_price(0, 10.125), Ok(dec!(10.13)));
        assert_eq!(validate_price(0, 0.0), Ok(dec!(0)));
    }

    #[test]
    fn test_negative_or_nan_price_is_rejected() {
        assert_eq!(
            validate_price(1, -5.0),
            Err(PricingError::InvalidPrice { line: 1, value: -5.0 })
        );
        assert!(validate_price(1, f64::NAN).is_err());
        assert!(validate_price(1, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_discount_bounds() {
        assert_eq!(DiscountPercent::try_from(0.0).unwrap(), DiscountPercent::ZERO);
        assert_eq!(DiscountPercent::try_from(100.0).unwrap().value(), dec!(100));
        assert_eq!(DiscountPercent::try_from(12.5).unwrap().value(), dec!(12.5));
        assert_eq!(DiscountPercent::try_from(100.5), Err(PricingError::InvalidDiscount(100.5)));
        assert_eq!(DiscountPercent::try_from(-0.1), Err(PricingError::InvalidDiscount(-0.1)));
        assert!(DiscountPercent::try_from(f64::NAN).is_err());
        assert!(DiscountPercent::new(dec!(-1)).is_err());
        assert!(DiscountPercent::new(dec!(100.0001)).is_err());
    }

    #[test]
    fn test_line_item_validation_reports_first_bad_field() {
        let item = validate_line_item(0, "product_1", "Speed 250ml", 2.0, 1200.0, PriceList::A).unwrap();
        assert_eq!(item.subtotal(), dec!(2400));

        let err = validate_line_item(3, "product_1", "Speed 250ml", -2.0, -1.0, PriceList::A).unwrap_err();
        assert_eq!(err, PricingError::InvalidQuantity { line: 3, value: -2.0 });
    }

    #[test]
    fn test_error_messages_name_the_line() {
        let err = PricingError::InvalidPrice { line: 1, value: -3.0 };
        assert_eq!(err.to_string(), "Invalid price on line 1: -3");
    }
}
