use rust_decimal::Decimal;

use crate::config::ExitTiers;
use crate::types::{Money, Ratio};

/// Exit percentage for an after-repair value.
///
/// Walks the ascending tiers and returns the first whose `below` bound
/// exceeds `arv`; ARVs that clear every tier get `top_pct`. With the stock
/// ladder: <150k → 0.60, <200k → 0.65, <300k → 0.70, <400k → 0.75, else 0.80.
pub fn exit_percentage(arv: Money, tiers: &ExitTiers) -> Ratio {
    tiers
        .tiers
        .iter()
        .find(|t| arv < t.below)
        .map(|t| t.pct)
        .unwrap_or(tiers.top_pct)
}

/// `arv * exit_percentage(arv)`
pub fn preferred_exit_price(arv: Money, tiers: &ExitTiers) -> Money {
    arv * exit_percentage(arv, tiers)
}
