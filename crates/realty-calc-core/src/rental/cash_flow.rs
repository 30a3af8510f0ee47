use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{checked_pct, with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

/// Monthly operating figures and the cash put into the deal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowInputs {
    pub monthly_revenue: Money,
    pub monthly_expenses: Money,
    pub monthly_debt_service: Money,
    pub total_cash_invested: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowResult {
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// `None` when nothing was invested
    pub cash_on_cash_return_pct: Option<Percent>,
}

/// Cash flow after debt service and the resulting cash-on-cash return.
pub fn cash_flow(inputs: &CashFlowInputs) -> CashFlowResult {
    let monthly_cash_flow =
        inputs.monthly_revenue - inputs.monthly_expenses - inputs.monthly_debt_service;
    let annual_cash_flow = monthly_cash_flow * Decimal::from(12);

    CashFlowResult {
        monthly_cash_flow,
        annual_cash_flow,
        cash_on_cash_return_pct: checked_pct(annual_cash_flow, inputs.total_cash_invested),
    }
}

/// [`cash_flow`] wrapped in the standard envelope, with warnings for
/// negative cash flow and an undefined return.
pub fn analyze_cash_flow(
    inputs: &CashFlowInputs,
) -> RealtyCalcResult<ComputationOutput<CashFlowResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        revenue = %inputs.monthly_revenue,
        expenses = %inputs.monthly_expenses,
        debt_service = %inputs.monthly_debt_service,
        invested = %inputs.total_cash_invested,
        "analyzing cash flow"
    );

    let result = cash_flow(inputs);

    if result.cash_on_cash_return_pct.is_none() {
        warnings.push("Total cash invested is zero; cash-on-cash return is undefined".into());
    }
    if result.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative cash flow of {} per month",
            result.monthly_cash_flow.round_dp(2)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash Flow and Cash-on-Cash Return",
        inputs,
        warnings,
        elapsed,
        result,
    ))
}
