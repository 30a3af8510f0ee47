use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::CriteriaThresholds;
use crate::types::{checked_ratio, with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

/// The deal metrics the criteria are judged on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaMetrics {
    pub monthly_cash_flow: Money,
    pub purchase_price: Money,
    pub cash_on_cash_return_pct: Option<Percent>,
    pub down_payment: Money,
    pub interest_rate_pct: Percent,
    pub balloon_years: u32,
}

/// Pass/fail for each investment criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealCriteria {
    pub meets_minimum_cash_flow: bool,
    pub meets_maximum_offer_price: bool,
    pub meets_minimum_cash_on_cash: bool,
    pub meets_maximum_down_payment: bool,
    pub meets_maximum_interest_rate: bool,
    pub meets_minimum_balloon: bool,
}

impl DealCriteria {
    fn checks(&self) -> [(&'static str, bool); 6] {
        [
            ("minimum_cash_flow", self.meets_minimum_cash_flow),
            ("maximum_offer_price", self.meets_maximum_offer_price),
            ("minimum_cash_on_cash", self.meets_minimum_cash_on_cash),
            ("maximum_down_payment", self.meets_maximum_down_payment),
            ("maximum_interest_rate", self.meets_maximum_interest_rate),
            ("minimum_balloon", self.meets_minimum_balloon),
        ]
    }

    pub fn met_count(&self) -> u32 {
        self.checks().iter().filter(|(_, ok)| *ok).count() as u32
    }

    pub fn all_met(&self) -> bool {
        self.checks().iter().all(|(_, ok)| *ok)
    }

    /// Names of the criteria that failed.
    pub fn failed(&self) -> Vec<String> {
        self.checks()
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| (*name).to_string())
            .collect()
    }
}

/// Compare each metric against its threshold.
///
/// Bounds are inclusive. An undefined cash-on-cash return fails, as does a
/// down payment against a zero purchase price.
pub fn check_criteria(metrics: &CriteriaMetrics, thresholds: &CriteriaThresholds) -> DealCriteria {
    let down_payment_ratio = checked_ratio(metrics.down_payment, metrics.purchase_price);

    DealCriteria {
        meets_minimum_cash_flow: metrics.monthly_cash_flow >= thresholds.min_monthly_cash_flow,
        meets_maximum_offer_price: metrics.purchase_price <= thresholds.max_purchase_price,
        meets_minimum_cash_on_cash: metrics
            .cash_on_cash_return_pct
            .is_some_and(|coc| coc >= thresholds.min_cash_on_cash_pct),
        meets_maximum_down_payment: down_payment_ratio
            .is_some_and(|r| r <= thresholds.max_down_payment_ratio),
        meets_maximum_interest_rate: metrics.interest_rate_pct <= thresholds.max_interest_rate_pct,
        meets_minimum_balloon: metrics.balloon_years >= thresholds.min_balloon_years,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaReport {
    pub criteria: DealCriteria,
    pub met: u32,
    pub total: u32,
    pub all_met: bool,
    pub failed: Vec<String>,
    /// Down payment as a fraction of price, when defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment_ratio: Option<Decimal>,
}

/// Criteria check wrapped in the standard envelope.
pub fn evaluate_criteria(
    metrics: &CriteriaMetrics,
    thresholds: &CriteriaThresholds,
) -> RealtyCalcResult<ComputationOutput<CriteriaReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let criteria = check_criteria(metrics, thresholds);
    let down_payment_ratio = checked_ratio(metrics.down_payment, metrics.purchase_price);

    if metrics.cash_on_cash_return_pct.is_none() {
        warnings.push("Cash-on-cash return undefined; minimum_cash_on_cash fails".into());
    }
    if down_payment_ratio.is_none() {
        warnings.push("Purchase price is zero; maximum_down_payment fails".into());
    }

    let report = CriteriaReport {
        met: criteria.met_count(),
        total: 6,
        all_met: criteria.all_met(),
        failed: criteria.failed(),
        criteria,
        down_payment_ratio,
    };

    tracing::debug!(met = report.met, all_met = report.all_met, "evaluated deal criteria");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Criteria Threshold Check",
        &serde_json::json!({ "metrics": metrics, "thresholds": thresholds }),
        warnings,
        elapsed,
        report,
    ))
}
