//! Order pricing: line items, discount, totals, VAT and cash change.
//!
//! Every order view computes its totals through [`compute_totals`]; nothing
//! stores a total that could drift from its items.

pub mod calculator;
pub mod tax;
pub mod validation;

pub use calculator::*;
pub use tax::*;
pub use validation::*;
