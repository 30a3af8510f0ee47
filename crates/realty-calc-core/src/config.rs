//! Tunable policy constants for the calculators.
//!
//! Every threshold and heuristic the calculators apply lives here rather than
//! as a literal in the formula code. `CalculatorConfig::default()` reproduces
//! the stock values; a TOML file may override any subset of them.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyCalcError;
use crate::types::{Money, Percent, Ratio};
use crate::RealtyCalcResult;

/// Pass/fail thresholds used by the deal-criteria checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaThresholds {
    /// Minimum acceptable monthly cash flow
    pub min_monthly_cash_flow: Money,
    /// Maximum purchase price
    pub max_purchase_price: Money,
    /// Minimum cash-on-cash return, in percent
    pub min_cash_on_cash_pct: Percent,
    /// Maximum down payment as a fraction of price (inclusive)
    pub max_down_payment_ratio: Ratio,
    /// Maximum interest rate, in percent
    pub max_interest_rate_pct: Percent,
    /// Minimum years before a balloon falls due
    pub min_balloon_years: u32,
}

impl Default for CriteriaThresholds {
    fn default() -> Self {
        Self {
            min_monthly_cash_flow: dec!(200),
            max_purchase_price: dec!(500000),
            min_cash_on_cash_pct: dec!(13),
            max_down_payment_ratio: dec!(0.15),
            max_interest_rate_pct: dec!(4),
            min_balloon_years: 5,
        }
    }
}

/// One bracket of the ARV exit-percentage ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitTier {
    /// Applies to ARVs strictly below this value
    pub below: Money,
    pub pct: Ratio,
}

/// Tiered exit percentage keyed by after-repair value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitTiers {
    /// Ascending by `below`
    pub tiers: Vec<ExitTier>,
    /// Used when the ARV clears every tier
    pub top_pct: Ratio,
}

impl Default for ExitTiers {
    fn default() -> Self {
        let tier = |below: Decimal, pct: Decimal| ExitTier { below, pct };
        Self {
            tiers: vec![
                tier(dec!(150000), dec!(0.60)),
                tier(dec!(200000), dec!(0.65)),
                tier(dec!(300000), dec!(0.70)),
                tier(dec!(400000), dec!(0.75)),
            ],
            top_pct: dec!(0.80),
        }
    }
}

/// Percentage-of-ARV heuristics for wholesale offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WholesaleHeuristics {
    pub preferred_offer_ratio: Ratio,
    pub max_offer_ratio: Ratio,
    /// Default assignment fee as a fraction of ARV
    pub assignment_fee_ratio: Ratio,
    pub assignment_fee_floor: Money,
    /// Upper bound on the default fee as a fraction of ARV
    pub assignment_fee_cap_ratio: Ratio,
}

impl Default for WholesaleHeuristics {
    fn default() -> Self {
        Self {
            preferred_offer_ratio: dec!(0.66),
            max_offer_ratio: dec!(0.83),
            assignment_fee_ratio: dec!(0.05),
            assignment_fee_floor: dec!(3000),
            assignment_fee_cap_ratio: dec!(0.10),
        }
    }
}

/// Property condition used to key the flat rehab estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehabCondition {
    Easy,
    #[default]
    Medium,
    Bad,
}

/// Flat rehab estimates by square-footage band and condition.
///
/// `band_limits` holds the exclusive upper bound of each band except the
/// last; each cost list therefore has `band_limits.len() + 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RehabTable {
    pub band_limits: Vec<Decimal>,
    pub easy: Vec<Money>,
    pub medium: Vec<Money>,
    pub bad: Vec<Money>,
}

impl Default for RehabTable {
    fn default() -> Self {
        Self {
            band_limits: vec![dec!(1000), dec!(1500), dec!(2000)],
            easy: vec![dec!(10000), dec!(15000), dec!(20000), dec!(25000)],
            medium: vec![dec!(20000), dec!(30000), dec!(40000), dec!(50000)],
            bad: vec![dec!(40000), dec!(55000), dec!(70000), dec!(85000)],
        }
    }
}

impl RehabTable {
    pub fn costs_for(&self, condition: RehabCondition) -> &[Money] {
        match condition {
            RehabCondition::Easy => &self.easy,
            RehabCondition::Medium => &self.medium,
            RehabCondition::Bad => &self.bad,
        }
    }
}

/// All calculator policy in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub criteria: CriteriaThresholds,
    pub exit_tiers: ExitTiers,
    pub wholesale: WholesaleHeuristics,
    pub rehab_table: RehabTable,
}

impl CalculatorConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> RealtyCalcResult<Self> {
        let config: CalculatorConfig = toml::from_str(s).map_err(|e| config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> RealtyCalcResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| config_error(format!("failed to read '{}': {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded calculator config");
        Ok(config)
    }

    pub fn validate(&self) -> RealtyCalcResult<()> {
        if self
            .exit_tiers
            .tiers
            .windows(2)
            .any(|w| w[0].below >= w[1].below)
        {
            return Err(config_error(
                "exit_tiers.tiers must be sorted by ascending `below`".into(),
            ));
        }

        let t = &self.rehab_table;
        if t.band_limits.windows(2).any(|w| w[0] >= w[1]) {
            return Err(config_error(
                "rehab_table.band_limits must be strictly ascending".into(),
            ));
        }
        let expected = t.band_limits.len() + 1;
        for (name, costs) in [("easy", &t.easy), ("medium", &t.medium), ("bad", &t.bad)] {
            if costs.len() != expected {
                return Err(config_error(format!(
                    "rehab_table.{name} needs {expected} entries, found {}",
                    costs.len()
                )));
            }
        }

        if self.criteria.max_down_payment_ratio < Decimal::ZERO {
            return Err(config_error(
                "criteria.max_down_payment_ratio must not be negative".into(),
            ));
        }
        Ok(())
    }
}

fn config_error(reason: String) -> RealtyCalcError {
    RealtyCalcError::InvalidInput {
        field: "config".into(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_matches_stock_thresholds() {
        let c = CalculatorConfig::default();
        assert_eq!(c.criteria.min_monthly_cash_flow, dec!(200));
        assert_eq!(c.criteria.max_purchase_price, dec!(500000));
        assert_eq!(c.criteria.min_cash_on_cash_pct, dec!(13));
        assert_eq!(c.criteria.max_down_payment_ratio, dec!(0.15));
        assert_eq!(c.criteria.max_interest_rate_pct, dec!(4));
        assert_eq!(c.criteria.min_balloon_years, 5);
        assert_eq!(c.exit_tiers.tiers.len(), 4);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c = CalculatorConfig::from_toml_str("").unwrap();
        assert_eq!(c, CalculatorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let c = CalculatorConfig::from_toml_str(
            r#"
            [criteria]
            min_monthly_cash_flow = "250"
            min_balloon_years = 7
            "#,
        )
        .unwrap();
        assert_eq!(c.criteria.min_monthly_cash_flow, dec!(250));
        assert_eq!(c.criteria.min_balloon_years, 7);
        // untouched fields keep their defaults
        assert_eq!(c.criteria.max_purchase_price, dec!(500000));
        assert_eq!(c.wholesale, WholesaleHeuristics::default());
    }

    #[test]
    fn test_unsorted_tiers_rejected() {
        let err = CalculatorConfig::from_toml_str(
            r#"
            [exit_tiers]
            top_pct = "0.8"
            [[exit_tiers.tiers]]
            below = "200000"
            pct = "0.65"
            [[exit_tiers.tiers]]
            below = "150000"
            pct = "0.60"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exit_tiers"));
    }

    #[test]
    fn test_rehab_table_shape_checked() {
        let mut c = CalculatorConfig::default();
        c.rehab_table.bad.pop();
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("rehab_table.bad"));
    }

    #[test]
    fn test_malformed_toml_is_invalid_input() {
        let err = CalculatorConfig::from_toml_str("criteria = [").unwrap_err();
        assert!(matches!(err, RealtyCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CalculatorConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
