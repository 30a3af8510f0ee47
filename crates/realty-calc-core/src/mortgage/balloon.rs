use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::{generate_schedule, AmortizationRow, LoanTerms};
use crate::error::RealtyCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

/// Remaining balance at the end of `balloon_year`.
///
/// Reads row `balloon_year * 12` of the full schedule. A balloon year of
/// zero, or one past the end of the term, falls back to the original
/// principal.
pub fn balloon_balance(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    balloon_year: u32,
    interest_only: bool,
) -> RealtyCalcResult<Money> {
    let terms = LoanTerms {
        principal,
        annual_rate_pct,
        term_years,
        interest_only,
        // dates play no part in the balance
        start_date: NaiveDate::default(),
    };
    let schedule = generate_schedule(&terms)?;
    Ok(balance_after_year(&schedule, balloon_year, principal))
}

/// Closing balance of the last payment in `year`, or `principal` when the
/// schedule has no such row.
fn balance_after_year(schedule: &[AmortizationRow], year: u32, principal: Money) -> Money {
    year.checked_mul(12)
        .and_then(|n| (n as usize).checked_sub(1))
        .and_then(|idx| schedule.get(idx))
        .map(|row| row.balance)
        .unwrap_or(principal)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    /// Amortization term the payment is based on
    pub term_years: u32,
    /// Year at whose end the remaining balance falls due
    pub balloon_year: u32,
    #[serde(default)]
    pub interest_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonOutput {
    pub balloon_balance: Money,
    pub monthly_payment: Money,
    pub payments_before_balloon: u32,
    /// Principal retired before the balloon falls due
    pub principal_paid: Money,
    pub interest_paid: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balloon_date: Option<NaiveDate>,
}

/// Balloon payment analysis for a partially amortized loan.
pub fn calculate_balloon(input: &BalloonInput) -> RealtyCalcResult<ComputationOutput<BalloonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        principal = %input.principal,
        rate_pct = %input.annual_rate_pct,
        term_years = input.term_years,
        balloon_year = input.balloon_year,
        "calculating balloon balance"
    );

    let terms = LoanTerms {
        principal: input.principal,
        annual_rate_pct: input.annual_rate_pct,
        term_years: input.term_years,
        interest_only: input.interest_only,
        start_date: input.start_date.unwrap_or_default(),
    };
    let schedule = generate_schedule(&terms)?;

    let balloon_balance = balance_after_year(&schedule, input.balloon_year, input.principal);

    let in_range = input.balloon_year >= 1 && input.balloon_year <= input.term_years;
    if !in_range {
        warnings.push(format!(
            "Balloon year {} is outside the {}-year term; reporting the original principal",
            input.balloon_year, input.term_years
        ));
    }

    let payments_before_balloon = if in_range { input.balloon_year * 12 } else { 0 };
    let paid = &schedule[..payments_before_balloon as usize];
    let principal_paid: Decimal = paid.iter().map(|r| r.principal).sum();
    let interest_paid: Decimal = paid.iter().map(|r| r.interest).sum();

    let balloon_date = match input.start_date {
        Some(d) if in_range => Some(
            d.checked_add_months(Months::new(payments_before_balloon))
                .ok_or_else(|| RealtyCalcError::DateError("balloon date overflow".into()))?,
        ),
        _ => None,
    };

    let output = BalloonOutput {
        balloon_balance,
        monthly_payment: schedule[0].payment,
        payments_before_balloon,
        principal_paid,
        interest_paid,
        balloon_date,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Balloon Balance from Amortization Schedule",
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

    #[test]
    fn test_balloon_at_full_term_is_paid_off() {
        let bal = balloon_balance(dec!(200000), dec!(6), 30, 30, false).unwrap();
        assert!(bal.abs() < dec!(0.000001));
    }

    #[test]
    fn test_balloon_year_5_of_30() {
        // 200k at 6% over 30 years leaves ~186,108 after 60 payments
        let bal = balloon_balance(dec!(200000), dec!(6), 30, 5, false).unwrap();
        assert!((bal - dec!(186108.71)).abs() < dec!(1), "got {bal}");
    }

    #[test]
    fn test_balloon_beyond_term_falls_back_to_principal() {
        let bal = balloon_balance(dec!(150000), dec!(5), 10, 11, false).unwrap();
        assert_eq!(bal, dec!(150000));
    }

    #[test]
    fn test_balloon_year_zero_falls_back_to_principal() {
        let bal = balloon_balance(dec!(150000), dec!(5), 10, 0, false).unwrap();
        assert_eq!(bal, dec!(150000));
    }

    #[test]
    fn test_interest_only_balloon_is_principal() {
        let bal = balloon_balance(dec!(90000), dec!(7), 10, 3, true).unwrap();
        assert_eq!(bal, dec!(90000));
    }

    #[test]
    fn test_calculate_balloon_breakdown() {
        let input = BalloonInput {
            principal: dec!(200000),
            annual_rate_pct: dec!(6),
            term_years: 30,
            balloon_year: 5,
            interest_only: false,
            start_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        };
        let out = calculate_balloon(&input).unwrap();
        let r = &out.result;
        assert_eq!(r.payments_before_balloon, 60);
        assert!((r.principal_paid + r.balloon_balance - dec!(200000)).abs() < dec!(0.000001));
        assert_eq!(r.balloon_date, NaiveDate::from_ymd_opt(2029, 3, 1));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_balloon_out_of_range_warns() {
        let input = BalloonInput {
            principal: dec!(50000),
            annual_rate_pct: dec!(5),
            term_years: 5,
            balloon_year: 7,
            interest_only: false,
            start_date: None,
        };
        let out = calculate_balloon(&input).unwrap();
        assert_eq!(out.result.balloon_balance, dec!(50000));
        assert_eq!(out.result.payments_before_balloon, 0);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_calculate_balloon_matches_lookup() {
        let input = BalloonInput {
            principal: dec!(250000),
            annual_rate_pct: dec!(4.5),
            term_years: 25,
            balloon_year: 7,
            interest_only: false,
            start_date: None,
        };
        let out = calculate_balloon(&input).unwrap();
        let expected = balloon_balance(dec!(250000), dec!(4.5), 25, 7, false).unwrap();
        assert_eq!(out.result.balloon_balance, expected);
    }

    #[test]
    fn test_oversized_term_rejected() {
        let err = balloon_balance(dec!(100000), dec!(5), 400_000_000, 5, false).unwrap_err();
        assert!(matches!(err, RealtyCalcError::InvalidInput { ref field, .. } if field == "term_years"));
    }
}
