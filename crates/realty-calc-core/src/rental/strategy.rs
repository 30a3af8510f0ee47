//! Side-by-side comparison of rental strategies (long-term, mid-term,
//! short-term, room-by-room …) on the same property and financing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::cash_flow::{cash_flow, CashFlowInputs, CashFlowResult};
use crate::error::RealtyCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalStrategy {
    pub name: String,
    /// Rent at full occupancy
    pub gross_monthly_rent: Money,
    /// 0..=100
    pub occupancy_pct: Percent,
    pub monthly_operating_expenses: Money,
    /// Property management fee on collected rent, in percent
    #[serde(default)]
    pub management_fee_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalStrategyInput {
    pub monthly_debt_service: Money,
    pub total_cash_invested: Money,
    pub strategies: Vec<RentalStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub rank: u32,
    pub effective_monthly_revenue: Money,
    pub management_fee: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash_return_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalStrategyOutput {
    /// Best first
    pub ranking: Vec<StrategyResult>,
    pub best_strategy: String,
    /// Annual cash flow gap between best and worst
    pub spread_annual_cash_flow: Money,
}

/// Run each strategy through the cash-flow calculator and rank them by
/// annual cash flow.
pub fn compare_rental_strategies(
    input: &RentalStrategyInput,
) -> RealtyCalcResult<ComputationOutput<RentalStrategyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.strategies.is_empty() {
        return Err(RealtyCalcError::InvalidInput {
            field: "strategies".into(),
            reason: "At least one rental strategy is required".into(),
        });
    }

    tracing::debug!(strategies = input.strategies.len(), "comparing rental strategies");

    let mut results = Vec::with_capacity(input.strategies.len());
    for s in &input.strategies {
        if s.occupancy_pct < Decimal::ZERO || s.occupancy_pct > Decimal::ONE_HUNDRED {
            return Err(RealtyCalcError::InvalidInput {
                field: format!("strategies[{}].occupancy_pct", s.name),
                reason: "Occupancy must be between 0 and 100".into(),
            });
        }

        let effective = s.gross_monthly_rent * s.occupancy_pct / Decimal::ONE_HUNDRED;
        let management_fee = effective * s.management_fee_pct / Decimal::ONE_HUNDRED;

        let CashFlowResult {
            monthly_cash_flow,
            annual_cash_flow,
            cash_on_cash_return_pct,
        } = cash_flow(&CashFlowInputs {
            monthly_revenue: effective,
            monthly_expenses: s.monthly_operating_expenses + management_fee,
            monthly_debt_service: input.monthly_debt_service,
            total_cash_invested: input.total_cash_invested,
        });

        if monthly_cash_flow < Decimal::ZERO {
            warnings.push(format!("Strategy '{}' loses money every month", s.name));
        }

        results.push(StrategyResult {
            name: s.name.clone(),
            rank: 0,
            effective_monthly_revenue: effective,
            management_fee,
            monthly_cash_flow,
            annual_cash_flow,
            cash_on_cash_return_pct,
        });
    }

    if input.total_cash_invested.is_zero() {
        warnings.push("Total cash invested is zero; cash-on-cash returns are undefined".into());
    }

    // stable: ties keep input order
    results.sort_by(|a, b| b.annual_cash_flow.cmp(&a.annual_cash_flow));
    for (i, r) in results.iter_mut().enumerate() {
        r.rank = i as u32 + 1;
    }

    let best = &results[0];
    let worst = &results[results.len() - 1];
    let output = RentalStrategyOutput {
        best_strategy: best.name.clone(),
        spread_annual_cash_flow: best.annual_cash_flow - worst.annual_cash_flow,
        ranking: results,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Strategy Cash Flow Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn strategy(name: &str, rent: Decimal, occ: Decimal, opex: Decimal, fee: Decimal) -> RentalStrategy {
        RentalStrategy {
            name: name.into(),
            gross_monthly_rent: rent,
            occupancy_pct: occ,
            monthly_operating_expenses: opex,
            management_fee_pct: fee,
        }
    }

    fn sample() -> RentalStrategyInput {
        RentalStrategyInput {
            monthly_debt_service: dec!(1200),
            total_cash_invested: dec!(60000),
            strategies: vec![
                strategy("long-term", dec!(2200), dec!(95), dec!(450), dec!(8)),
                strategy("short-term", dec!(4500), dec!(65), dec!(900), dec!(20)),
                strategy("mid-term", dec!(3000), dec!(85), dec!(600), dec!(10)),
            ],
        }
    }

    #[test]
    fn test_long_term_figures() {
        let out = compare_rental_strategies(&sample()).unwrap();
        let lt = out
            .result
            .ranking
            .iter()
            .find(|r| r.name == "long-term")
            .unwrap();
        // 2200 * 95% = 2090; fee 8% = 167.2; CF = 2090 - 450 - 167.2 - 1200 = 272.8
        assert_eq!(lt.effective_monthly_revenue, dec!(2090));
        assert_eq!(lt.management_fee, dec!(167.2));
        assert_eq!(lt.monthly_cash_flow, dec!(272.8));
        assert_eq!(lt.annual_cash_flow, dec!(3273.6));
    }

    #[test]
    fn test_ranking_order() {
        let out = compare_rental_strategies(&sample()).unwrap();
        let r = &out.result;
        // short-term: 2925 - 900 - 585 - 1200 = 240
        // mid-term:   2550 - 600 - 255 - 1200 = 495
        assert_eq!(r.best_strategy, "mid-term");
        let names: Vec<&str> = r.ranking.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["mid-term", "long-term", "short-term"]);
        assert_eq!(r.ranking[0].rank, 1);
        assert_eq!(r.spread_annual_cash_flow, dec!(3060));
    }

    #[test]
    fn test_empty_strategies_rejected() {
        let mut input = sample();
        input.strategies.clear();
        assert!(compare_rental_strategies(&input).is_err());
    }

    #[test]
    fn test_bad_occupancy_rejected() {
        let mut input = sample();
        input.strategies[0].occupancy_pct = dec!(120);
        assert!(compare_rental_strategies(&input).is_err());
    }

    #[test]
    fn test_zero_invested_warns() {
        let mut input = sample();
        input.total_cash_invested = Decimal::ZERO;
        let out = compare_rental_strategies(&input).unwrap();
        assert!(out.result.ranking.iter().all(|r| r.cash_on_cash_return_pct.is_none()));
        assert!(out.warnings.iter().any(|w| w.contains("undefined")));
    }
}
