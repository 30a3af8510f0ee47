//! Rental income tax and straight-line depreciation estimate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

/// Recovery class for straight-line depreciation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyClass {
    /// 27.5-year recovery
    #[default]
    Residential,
    /// 39-year recovery
    Commercial,
}

impl PropertyClass {
    pub fn recovery_period_years(self) -> Decimal {
        match self {
            PropertyClass::Residential => dec!(27.5),
            PropertyClass::Commercial => dec!(39),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInput {
    pub purchase_price: Money,
    /// Land is not depreciable
    pub land_value: Money,
    #[serde(default)]
    pub capital_improvements: Money,
    #[serde(default)]
    pub property_class: PropertyClass,
    pub annual_rental_income: Money,
    pub annual_operating_expenses: Money,
    #[serde(default)]
    pub annual_mortgage_interest: Money,
    #[serde(default)]
    pub annual_principal_paid: Money,
    pub marginal_tax_rate_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxOutput {
    pub depreciable_basis: Money,
    pub recovery_period_years: Decimal,
    pub annual_depreciation: Money,
    /// Negative means a paper loss
    pub taxable_income: Money,
    pub estimated_tax: Money,
    /// Loss available to offset other passive income
    pub passive_loss: Money,
    pub tax_savings_from_depreciation: Money,
    pub pre_tax_cash_flow: Money,
    pub after_tax_cash_flow: Money,
}

pub fn estimate_tax(input: &TaxInput) -> RealtyCalcResult<ComputationOutput<TaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    tracing::debug!(
        price = %input.purchase_price,
        land = %input.land_value,
        class = ?input.property_class,
        "estimating rental tax"
    );

    let depreciable_basis =
        input.purchase_price - input.land_value + input.capital_improvements;
    let recovery_period_years = input.property_class.recovery_period_years();
    let annual_depreciation = depreciable_basis / recovery_period_years;

    let taxable_income = input.annual_rental_income
        - input.annual_operating_expenses
        - input.annual_mortgage_interest
        - annual_depreciation;

    let rate = input.marginal_tax_rate_pct / Decimal::ONE_HUNDRED;
    let estimated_tax = taxable_income.max(Decimal::ZERO) * rate;
    let passive_loss = (-taxable_income).max(Decimal::ZERO);

    let pre_tax_cash_flow = input.annual_rental_income
        - input.annual_operating_expenses
        - input.annual_mortgage_interest
        - input.annual_principal_paid;

    if passive_loss > Decimal::ZERO {
        warnings.push(format!(
            "Paper loss of {}; deductibility depends on passive activity rules",
            passive_loss.round_dp(2)
        ));
    }
    if input.land_value.is_zero() {
        warnings.push("Land value is zero; the whole price is being depreciated".into());
    }

    let output = TaxOutput {
        depreciable_basis,
        recovery_period_years,
        annual_depreciation,
        taxable_income,
        estimated_tax,
        passive_loss,
        tax_savings_from_depreciation: annual_depreciation * rate,
        pre_tax_cash_flow,
        after_tax_cash_flow: pre_tax_cash_flow - estimated_tax,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Straight-Line Depreciation and Rental Tax Estimate",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &TaxInput) -> RealtyCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(RealtyCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.land_value < Decimal::ZERO || input.land_value > input.purchase_price {
        return Err(RealtyCalcError::InvalidInput {
            field: "land_value".into(),
            reason: "Land value must be between zero and the purchase price".into(),
        });
    }
    if input.marginal_tax_rate_pct < Decimal::ZERO
        || input.marginal_tax_rate_pct > Decimal::ONE_HUNDRED
    {
        return Err(RealtyCalcError::InvalidInput {
            field: "marginal_tax_rate_pct".into(),
            reason: "Tax rate must be between 0 and 100".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaxInput {
        TaxInput {
            purchase_price: dec!(300000),
            land_value: dec!(50000),
            capital_improvements: dec!(25000),
            property_class: PropertyClass::Residential,
            annual_rental_income: dec!(30000),
            annual_operating_expenses: dec!(9000),
            annual_mortgage_interest: dec!(12000),
            annual_principal_paid: dec!(3000),
            marginal_tax_rate_pct: dec!(24),
        }
    }

    #[test]
    fn test_residential_depreciation() {
        let out = estimate_tax(&sample()).unwrap();
        let r = &out.result;
        assert_eq!(r.depreciable_basis, dec!(275000));
        assert_eq!(r.annual_depreciation, dec!(10000));
        assert_eq!(r.tax_savings_from_depreciation, dec!(2400));
    }

    #[test]
    fn test_paper_loss() {
        let out = estimate_tax(&sample()).unwrap();
        let r = &out.result;
        assert_eq!(r.taxable_income, dec!(-1000));
        assert_eq!(r.estimated_tax, Decimal::ZERO);
        assert_eq!(r.passive_loss, dec!(1000));
        assert_eq!(r.pre_tax_cash_flow, dec!(6000));
        assert_eq!(r.after_tax_cash_flow, dec!(6000));
        assert!(out.warnings.iter().any(|w| w.contains("Paper loss")));
    }

    #[test]
    fn test_taxable_profit() {
        let mut input = sample();
        input.annual_rental_income = dec!(40000);
        let r = estimate_tax(&input).unwrap().result;
        assert_eq!(r.taxable_income, dec!(9000));
        assert_eq!(r.estimated_tax, dec!(2160));
        assert_eq!(r.after_tax_cash_flow, dec!(13840));
    }

    #[test]
    fn test_commercial_recovery() {
        let input = TaxInput {
            purchase_price: dec!(500000),
            land_value: dec!(110000),
            capital_improvements: Decimal::ZERO,
            property_class: PropertyClass::Commercial,
            ..sample()
        };
        let r = estimate_tax(&input).unwrap().result;
        assert_eq!(r.recovery_period_years, dec!(39));
        assert_eq!(r.annual_depreciation, dec!(10000));
    }

    #[test]
    fn test_land_over_price_rejected() {
        let mut input = sample();
        input.land_value = dec!(300001);
        assert!(estimate_tax(&input).is_err());
    }
}
