//! Apartment and multifamily underwriting: income approach metrics plus
//! leveraged returns when financing is supplied.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyCalcError;
use crate::mortgage::payment::{interest_only_payment, monthly_payment};
use crate::types::{checked_pct, checked_ratio, with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A group of identical units in the rent roll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitGroup {
    pub count: u32,
    pub monthly_rent: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Down payment as a percent of price
    pub down_payment_pct: Percent,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub interest_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingInput {
    #[serde(default)]
    pub property_name: String,
    pub purchase_price: Money,
    pub units: Vec<UnitGroup>,
    /// Vacancy and collection loss, in percent
    pub vacancy_pct: Percent,
    #[serde(default)]
    pub other_monthly_income: Money,
    /// Taxes, insurance, repairs, management, reserves
    pub annual_operating_expenses: Money,
    #[serde(default)]
    pub closing_costs: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingTerms>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingOutput {
    pub unit_count: u32,
    /// Annual rent at 100% occupancy
    pub gross_potential_rent: Money,
    pub vacancy_loss: Money,
    pub effective_gross_income: Money,
    pub net_operating_income: Money,
    pub cap_rate_pct: Option<Percent>,
    pub gross_rent_multiplier: Option<Decimal>,
    pub price_per_unit: Option<Money>,
    pub expense_ratio_pct: Option<Percent>,
    pub loan_amount: Money,
    pub annual_debt_service: Money,
    pub dscr: Option<Decimal>,
    pub annual_cash_flow: Money,
    pub monthly_cash_flow: Money,
    pub total_cash_invested: Money,
    pub cash_on_cash_return_pct: Option<Percent>,
    /// Occupancy at which income covers expenses and debt service
    pub break_even_occupancy_pct: Option<Percent>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn underwrite_property(
    input: &UnderwritingInput,
) -> RealtyCalcResult<ComputationOutput<UnderwritingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    tracing::debug!(
        property = %input.property_name,
        price = %input.purchase_price,
        unit_groups = input.units.len(),
        "underwriting property"
    );

    let twelve = Decimal::from(12);

    // --- Income ---
    let unit_count = total_units(&input.units)?;
    let gross_potential_rent: Money = input
        .units
        .iter()
        .map(|u| Decimal::from(u.count) * u.monthly_rent * twelve)
        .sum();
    let vacancy_loss = gross_potential_rent * input.vacancy_pct / Decimal::ONE_HUNDRED;
    let other_income = input.other_monthly_income * twelve;
    let effective_gross_income = gross_potential_rent - vacancy_loss + other_income;
    let noi = effective_gross_income - input.annual_operating_expenses;

    // --- Financing ---
    let (loan_amount, down_payment, annual_debt_service) = match &input.financing {
        Some(f) => {
            let down = input.purchase_price * f.down_payment_pct / Decimal::ONE_HUNDRED;
            let loan = input.purchase_price - down;
            let pmt = if f.interest_only {
                interest_only_payment(loan, f.annual_rate_pct)
            } else {
                monthly_payment(loan, f.annual_rate_pct, f.term_years)?
            };
            (loan, down, pmt * twelve)
        }
        None => (Decimal::ZERO, input.purchase_price, Decimal::ZERO),
    };

    let total_cash_invested = down_payment + input.closing_costs;
    let annual_cash_flow = noi - annual_debt_service;

    let dscr = if input.financing.is_some() {
        checked_ratio(noi, annual_debt_service)
    } else {
        None
    };
    let cap_rate_pct = checked_pct(noi, input.purchase_price);

    // --- Warnings ---
    if noi < Decimal::ZERO {
        warnings.push("Net operating income is negative".into());
    }
    if let Some(d) = dscr {
        if d < dec!(1.25) {
            warnings.push(format!(
                "DSCR {} is below the 1.25x most lenders require",
                d.round_dp(2)
            ));
        }
    }
    if let Some(cap) = cap_rate_pct {
        if cap < dec!(4) {
            warnings.push(format!("Cap rate {}% is below 4%", cap.round_dp(2)));
        }
    }
    if input.vacancy_pct > dec!(15) {
        warnings.push(format!(
            "Vacancy {}% exceeds 15%, above typical market norms",
            input.vacancy_pct
        ));
    }

    let output = UnderwritingOutput {
        unit_count,
        gross_potential_rent,
        vacancy_loss,
        effective_gross_income,
        net_operating_income: noi,
        cap_rate_pct,
        gross_rent_multiplier: checked_ratio(input.purchase_price, gross_potential_rent),
        price_per_unit: checked_ratio(input.purchase_price, Decimal::from(unit_count)),
        expense_ratio_pct: checked_pct(input.annual_operating_expenses, effective_gross_income),
        loan_amount,
        annual_debt_service,
        dscr,
        annual_cash_flow,
        monthly_cash_flow: annual_cash_flow / twelve,
        total_cash_invested,
        cash_on_cash_return_pct: checked_pct(annual_cash_flow, total_cash_invested),
        break_even_occupancy_pct: checked_pct(
            input.annual_operating_expenses + annual_debt_service,
            gross_potential_rent + other_income,
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multifamily Underwriting (Income Approach)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn total_units(units: &[UnitGroup]) -> RealtyCalcResult<u32> {
    units
        .iter()
        .try_fold(0u32, |acc, u| acc.checked_add(u.count))
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "units".into(),
            reason: "Total unit count overflows".into(),
        })
}

fn validate_input(input: &UnderwritingInput) -> RealtyCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(RealtyCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if total_units(&input.units)? == 0 {
        return Err(RealtyCalcError::InvalidInput {
            field: "units".into(),
            reason: "At least one unit is required".into(),
        });
    }
    if input.units.iter().any(|u| u.monthly_rent < Decimal::ZERO) {
        return Err(RealtyCalcError::InvalidInput {
            field: "units".into(),
            reason: "Unit rents must not be negative".into(),
        });
    }
    if input.vacancy_pct < Decimal::ZERO || input.vacancy_pct >= Decimal::ONE_HUNDRED {
        return Err(RealtyCalcError::InvalidInput {
            field: "vacancy_pct".into(),
            reason: "Vacancy must be between 0 and 100 (exclusive upper)".into(),
        });
    }
    if let Some(f) = &input.financing {
        if f.down_payment_pct < Decimal::ZERO || f.down_payment_pct > Decimal::ONE_HUNDRED {
            return Err(RealtyCalcError::InvalidInput {
                field: "financing.down_payment_pct".into(),
                reason: "Down payment must be between 0 and 100 percent".into(),
            });
        }
    }
    Ok(())
}
