use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Monthly rate as a plain decimal: `annual_rate_pct / 12 / 100`.
pub fn periodic_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / Decimal::from(MONTHS_PER_YEAR) / Decimal::ONE_HUNDRED
}

/// Standard fixed-rate payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// `r = annual_rate_pct / 12 / 100`, `n = term_years * 12`. A zero rate
/// amortises straight-line (`P / n`).
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> RealtyCalcResult<Money> {
    let total_months = validate_loan(principal, annual_rate_pct, term_years)?;
    let r = periodic_rate(annual_rate_pct);

    if r.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = (Decimal::ONE + r)
        .checked_powu(u64::from(total_months))
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: format!("rate {annual_rate_pct}% over {total_months} months overflows"),
        })?;

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(RealtyCalcError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(principal * r * compound / denominator)
}

/// Interest-only payment: `P * annual_rate_pct / 12 / 100`.
pub fn interest_only_payment(principal: Money, annual_rate_pct: Percent) -> Money {
    principal * periodic_rate(annual_rate_pct)
}

/// Check the loan terms and return the number of monthly payments.
pub(crate) fn validate_loan(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> RealtyCalcResult<u32> {
    if principal < Decimal::ZERO {
        return Err(RealtyCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must not be negative".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(RealtyCalcError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Interest rate must not be negative".into(),
        });
    }
    if term_years == 0 {
        return Err(RealtyCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if term_years > MAX_TERM_YEARS {
        return Err(RealtyCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must not exceed {MAX_TERM_YEARS} years"),
        });
    }
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("{term_years} years overflows the month count"),
        })
}

// ---------------------------------------------------------------------------
// Mortgage payment calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub interest_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    /// 12 * monthly payment
    pub annual_debt_service: Money,
    /// Sum of every payment over the full term
    pub total_of_payments: Money,
    pub total_interest: Money,
}

/// Monthly payment plus lifetime totals for a single loan.
pub fn calculate_payment(input: &PaymentInput) -> RealtyCalcResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        principal = %input.principal,
        rate_pct = %input.annual_rate_pct,
        term_years = input.term_years,
        interest_only = input.interest_only,
        "calculating mortgage payment"
    );

    let total_months = validate_loan(input.principal, input.annual_rate_pct, input.term_years)?;

    let payment = if input.interest_only {
        interest_only_payment(input.principal, input.annual_rate_pct)
    } else {
        monthly_payment(input.principal, input.annual_rate_pct, input.term_years)?
    };

    let total_of_payments = payment * Decimal::from(total_months);
    let total_interest = if input.interest_only {
        // principal is still owed in full at maturity
        total_of_payments
    } else {
        total_of_payments - input.principal
    };

    if input.interest_only {
        warnings.push(format!(
            "Interest-only: the full principal of {} remains due at maturity",
            input.principal.round_dp(2)
        ));
    }
    if input.annual_rate_pct > dec!(15) {
        warnings.push(format!(
            "Rate {}% is above 15%; check it is an annual rate in percent",
            input.annual_rate_pct
        ));
    }

    let output = PaymentOutput {
        monthly_payment: payment,
        annual_debt_service: payment * Decimal::from(MONTHS_PER_YEAR),
        total_of_payments,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        if input.interest_only {
            "Interest-Only Mortgage Payment"
        } else {
            "Fixed-Rate Amortizing Mortgage Payment"
        },
        input,
        warnings,
        elapsed,
        output,
    ))
}
