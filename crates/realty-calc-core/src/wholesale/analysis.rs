use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::exit::exit_percentage;
use super::rehab::{resolve_rehab_cost, RehabCondition, RehabItem, RehabSource};
use crate::config::{CalculatorConfig, WholesaleHeuristics};
use crate::error::RealtyCalcError;
use crate::types::{checked_pct, with_metadata, ComputationOutput, Money, Percent, Ratio};
use crate::RealtyCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Wholesale flip inputs. Missing numbers are expected as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WholesaleInput {
    /// After-repair value
    pub arv: Money,
    /// Manually entered rehab cost; lowest precedence
    pub rehab_cost: Money,
    pub holding_cost: Money,
    pub closing_cost: Money,
    /// Assignment fee override; zero means use the default fee
    pub user_fee: Money,
    /// When positive, rehab is estimated from the footage table
    pub square_footage: Decimal,
    pub condition: RehabCondition,
    pub rehab_items: Vec<RehabItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WholesaleResult {
    pub max_allowable_offer: Money,
    pub preferred_offer: Money,
    pub assignment_fee: Money,
    pub wholesale_price: Money,
    pub investor_profit: Money,
    /// Investor ROI in percent; `None` on a zero cost basis
    pub roi: Option<Percent>,
    /// Investor profit as a percent of ARV; `None` when ARV is zero
    pub minimum_score: Option<Percent>,
    pub exit_percentage: Ratio,
    pub total_rehab_cost: Money,
    pub rehab_source: RehabSource,
    pub preferred_exit_price: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Default assignment fee: 5% of ARV, at least the floor, never more than
/// 10% of ARV. The cap wins when the two conflict on small deals.
pub fn default_assignment_fee(arv: Money, h: &WholesaleHeuristics) -> Money {
    (arv * h.assignment_fee_ratio)
        .max(h.assignment_fee_floor)
        .min(arv * h.assignment_fee_cap_ratio)
}

/// Maximum-allowable-offer analysis for a wholesale deal.
///
/// Offers are fixed fractions of ARV less rehab; the investor's side of the
/// deal assumes they buy at the wholesale price and carry rehab, holding
/// and closing costs to an ARV sale.
pub fn wholesale_analysis(
    input: &WholesaleInput,
    config: &CalculatorConfig,
) -> RealtyCalcResult<ComputationOutput<WholesaleResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    tracing::debug!(
        arv = %input.arv,
        rehab_cost = %input.rehab_cost,
        square_footage = %input.square_footage,
        items = input.rehab_items.len(),
        "running wholesale analysis"
    );

    let h = &config.wholesale;
    let arv = input.arv;

    let (rehab, rehab_source) = resolve_rehab_cost(
        input.square_footage,
        input.condition,
        &input.rehab_items,
        input.rehab_cost,
        &config.rehab_table,
    );

    let preferred_offer = arv * h.preferred_offer_ratio - rehab;
    let max_allowable_offer = arv * h.max_offer_ratio - rehab;

    let assignment_fee = if input.user_fee > Decimal::ZERO {
        input.user_fee
    } else {
        default_assignment_fee(arv, h)
    };

    let wholesale_price = preferred_offer + assignment_fee;
    let investor_cost = wholesale_price + rehab + input.holding_cost + input.closing_cost;
    let investor_profit = arv - investor_cost;

    let roi = checked_pct(investor_profit, investor_cost);
    let minimum_score = checked_pct(investor_profit, arv);

    let exit_pct = exit_percentage(arv, &config.exit_tiers);
    let preferred_exit_price = arv * exit_pct;

    // --- Warnings ---
    if preferred_offer < Decimal::ZERO {
        warnings.push(format!(
            "Rehab cost {} exceeds {}% of ARV; preferred offer is negative",
            rehab.round_dp(2),
            h.preferred_offer_ratio * Decimal::ONE_HUNDRED
        ));
    }
    if investor_profit < Decimal::ZERO {
        warnings.push("Investor would lose money at the wholesale price".into());
    }
    if roi.is_none() {
        warnings.push("Investor cost basis is zero; ROI is undefined".into());
    }
    if minimum_score.is_none() {
        warnings.push("ARV is zero; minimum score is undefined".into());
    }
    if input.user_fee > Decimal::ZERO && input.user_fee > arv * h.assignment_fee_cap_ratio {
        warnings.push(format!(
            "Assignment fee {} is above {}% of ARV",
            input.user_fee.round_dp(2),
            h.assignment_fee_cap_ratio * Decimal::ONE_HUNDRED
        ));
    }

    let output = WholesaleResult {
        max_allowable_offer,
        preferred_offer,
        assignment_fee,
        wholesale_price,
        investor_profit,
        roi,
        minimum_score,
        exit_percentage: exit_pct,
        total_rehab_cost: rehab,
        rehab_source,
        preferred_exit_price,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Wholesale Maximum Allowable Offer (percentage-of-ARV)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &WholesaleInput) -> RealtyCalcResult<()> {
    let non_negative = [
        ("arv", input.arv),
        ("rehab_cost", input.rehab_cost),
        ("holding_cost", input.holding_cost),
        ("closing_cost", input.closing_cost),
        ("user_fee", input.user_fee),
        ("square_footage", input.square_footage),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(RealtyCalcError::InvalidInput {
                field: field.into(),
                reason: "Must not be negative".into(),
            });
        }
    }
    Ok(())
}
