use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Default VAT rate, in percent.
pub const DEFAULT_VAT_RATE: u32 = 21;

/// Split of a VAT-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatBreakdown {
    pub net: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

fn round_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Breaks a gross (VAT-inclusive) amount into net and VAT parts.
///
/// Net and VAT are each rounded to whole currency units, so their sum can
/// differ from `total` by one unit.
pub fn vat_breakdown(gross: Decimal, rate_percent: u32) -> VatBreakdown {
    let divisor = Decimal::ONE + Decimal::from(rate_percent) / Decimal::ONE_HUNDRED;
    let net = gross / divisor;
    VatBreakdown {
        net: round_units(net),
        vat: round_units(gross - net),
        total: gross,
    }
}

/// Change owed for a cash payment. Never negative.
pub fn change_due(total: Decimal, tendered: Decimal) -> Decimal {
    (tendered - total).max(Decimal::ZERO)
}
