//! Deal comparison and portfolio dashboard totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

use crate::error::RealtyCalcError;
use crate::types::{checked_pct, with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealSummary {
    pub name: String,
    pub purchase_price: Money,
    pub monthly_cash_flow: Money,
    pub total_cash_invested: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealComparisonInput {
    pub deals: Vec<DealSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDeal {
    pub rank: u32,
    pub name: String,
    pub purchase_price: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash_return_pct: Option<Percent>,
    pub cap_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub deal_count: u32,
    pub total_purchase_price: Money,
    pub total_cash_invested: Money,
    pub total_annual_cash_flow: Money,
    pub portfolio_cash_on_cash_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealComparisonOutput {
    /// Ranked by cash-on-cash return; undefined returns sort last
    pub ranking: Vec<RankedDeal>,
    pub best_cash_on_cash: Option<String>,
    pub best_cash_flow: String,
    pub best_cap_rate: Option<String>,
    pub totals: PortfolioTotals,
}

fn by_return_desc(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_deals(
    input: &DealComparisonInput,
) -> RealtyCalcResult<ComputationOutput<DealComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.deals.len() < 2 {
        return Err(RealtyCalcError::InvalidInput {
            field: "deals".into(),
            reason: "At least two deals are required for a comparison".into(),
        });
    }

    tracing::debug!(deals = input.deals.len(), "comparing deals");

    let twelve = Decimal::from(12);
    let mut ranking: Vec<RankedDeal> = input
        .deals
        .iter()
        .map(|d| {
            let annual = d.monthly_cash_flow * twelve;
            RankedDeal {
                rank: 0,
                name: d.name.clone(),
                purchase_price: d.purchase_price,
                annual_cash_flow: annual,
                cash_on_cash_return_pct: checked_pct(annual, d.total_cash_invested),
                cap_rate_pct: d.cap_rate_pct,
            }
        })
        .collect();

    for r in ranking.iter().filter(|r| r.cash_on_cash_return_pct.is_none()) {
        warnings.push(format!(
            "Deal '{}' has no cash invested; cash-on-cash return is undefined",
            r.name
        ));
    }

    ranking.sort_by(|a, b| by_return_desc(a.cash_on_cash_return_pct, b.cash_on_cash_return_pct));
    for (i, r) in ranking.iter_mut().enumerate() {
        r.rank = i as u32 + 1;
    }

    let best_cash_on_cash = ranking
        .first()
        .filter(|r| r.cash_on_cash_return_pct.is_some())
        .map(|r| r.name.clone());
    let best_cash_flow = ranking
        .iter()
        .max_by(|a, b| a.annual_cash_flow.cmp(&b.annual_cash_flow))
        .map(|r| r.name.clone())
        .unwrap_or_default();
    let best_cap_rate = ranking
        .iter()
        .filter_map(|r| r.cap_rate_pct.map(|c| (c, &r.name)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, name)| name.clone());

    let total_cash_invested: Money = input.deals.iter().map(|d| d.total_cash_invested).sum();
    let total_annual_cash_flow: Money = ranking.iter().map(|r| r.annual_cash_flow).sum();
    let totals = PortfolioTotals {
        deal_count: input.deals.len() as u32,
        total_purchase_price: input.deals.iter().map(|d| d.purchase_price).sum(),
        total_cash_invested,
        total_annual_cash_flow,
        portfolio_cash_on_cash_pct: checked_pct(total_annual_cash_flow, total_cash_invested),
    };

    let output = DealComparisonOutput {
        ranking,
        best_cash_on_cash,
        best_cash_flow,
        best_cap_rate,
        totals,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Comparison by Cash-on-Cash Return",
        input,
        warnings,
        elapsed,
        output,
    ))
}
