//! Creative financing (seller carry / subject-to) deal analysis.
//!
//! Combines the payment, balloon, cash-flow and criteria calculators into
//! the single view an investor uses to judge a seller-financed offer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::CalculatorConfig;
use crate::error::RealtyCalcError;
use crate::mortgage::balloon::balloon_balance;
use crate::mortgage::payment::{interest_only_payment, monthly_payment};
use crate::rental::cash_flow::{cash_flow, CashFlowInputs, CashFlowResult};
use crate::rental::criteria::{check_criteria, CriteriaMetrics, DealCriteria};
use crate::types::{checked_ratio, with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeFinancingInput {
    pub purchase_price: Money,
    pub down_payment: Money,
    #[serde(default)]
    pub closing_costs: Money,
    #[serde(default)]
    pub rehab_cost: Money,
    pub annual_rate_pct: Percent,
    /// Term the payment amortizes over
    pub amortization_years: u32,
    /// Year the remaining balance falls due
    pub balloon_years: u32,
    #[serde(default)]
    pub interest_only: bool,
    pub monthly_rent: Money,
    pub monthly_expenses: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeFinancingOutput {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_cash_invested: Money,
    pub cash_flow: CashFlowResult,
    pub balloon_balance: Money,
    pub down_payment_ratio: Option<Decimal>,
    pub criteria: DealCriteria,
    pub criteria_met: u32,
    pub all_criteria_met: bool,
}

pub fn analyze_creative_deal(
    input: &CreativeFinancingInput,
    config: &CalculatorConfig,
) -> RealtyCalcResult<ComputationOutput<CreativeFinancingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.down_payment < Decimal::ZERO {
        return Err(RealtyCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must not be negative".into(),
        });
    }
    if input.down_payment > input.purchase_price {
        return Err(RealtyCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the purchase price".into(),
        });
    }

    tracing::debug!(
        price = %input.purchase_price,
        down = %input.down_payment,
        rate_pct = %input.annual_rate_pct,
        balloon_years = input.balloon_years,
        "analyzing creative financing deal"
    );

    let loan_amount = input.purchase_price - input.down_payment;
    let payment = if input.interest_only {
        interest_only_payment(loan_amount, input.annual_rate_pct)
    } else {
        monthly_payment(loan_amount, input.annual_rate_pct, input.amortization_years)?
    };

    let balloon = balloon_balance(
        loan_amount,
        input.annual_rate_pct,
        input.amortization_years,
        input.balloon_years,
        input.interest_only,
    )?;

    let total_cash_invested = input.down_payment + input.closing_costs + input.rehab_cost;
    let cf = cash_flow(&CashFlowInputs {
        monthly_revenue: input.monthly_rent,
        monthly_expenses: input.monthly_expenses,
        monthly_debt_service: payment,
        total_cash_invested,
    });

    let criteria = check_criteria(
        &CriteriaMetrics {
            monthly_cash_flow: cf.monthly_cash_flow,
            purchase_price: input.purchase_price,
            cash_on_cash_return_pct: cf.cash_on_cash_return_pct,
            down_payment: input.down_payment,
            interest_rate_pct: input.annual_rate_pct,
            balloon_years: input.balloon_years,
        },
        &config.criteria,
    );

    if input.balloon_years > input.amortization_years {
        warnings.push(format!(
            "Balloon year {} is past the {}-year amortization; no balloon falls due",
            input.balloon_years, input.amortization_years
        ));
    }
    if cf.cash_on_cash_return_pct.is_none() {
        warnings.push("No cash invested; cash-on-cash return is undefined".into());
    }
    if !criteria.all_met() {
        warnings.push(format!("Criteria not met: {}", criteria.failed().join(", ")));
    }

    let output = CreativeFinancingOutput {
        loan_amount,
        monthly_payment: payment,
        total_cash_invested,
        balloon_balance: balloon,
        down_payment_ratio: checked_ratio(input.down_payment, input.purchase_price),
        criteria_met: criteria.met_count(),
        all_criteria_met: criteria.all_met(),
        criteria,
        cash_flow: cf,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Creative Financing: Seller-Carry Payment, Balloon and Criteria",
        input,
        warnings,
        elapsed,
        output,
    ))
}
