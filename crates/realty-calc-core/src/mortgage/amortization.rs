use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::{interest_only_payment, monthly_payment, periodic_rate, validate_loan};
use crate::error::RealtyCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan terms for a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate in percent (6 = 6%)
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub interest_only: bool,
    /// First payment falls one month after this date
    pub start_date: NaiveDate,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Remaining balance after this payment. For interest-only loans this
    /// is the original principal on every row.
    pub balance: Money,
}

/// Schedule plus the lifetime totals shown under a mortgage calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub payoff_date: NaiveDate,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Month-by-month schedule of `term_years * 12` rows.
///
/// Each row charges interest on the previous balance. Amortizing loans pay
/// down `payment - interest`; interest-only loans pay no principal and
/// report the original principal as the balance on every row. The balance
/// never goes below zero.
pub fn generate_schedule(terms: &LoanTerms) -> RealtyCalcResult<Vec<AmortizationRow>> {
    let total_months = validate_loan(terms.principal, terms.annual_rate_pct, terms.term_years)?;
    let r = periodic_rate(terms.annual_rate_pct);
    let payment = if terms.interest_only {
        interest_only_payment(terms.principal, terms.annual_rate_pct)
    } else {
        monthly_payment(terms.principal, terms.annual_rate_pct, terms.term_years)?
    };

    let mut rows = Vec::with_capacity(total_months as usize);
    let mut balance = terms.principal;

    for i in 1..=total_months {
        let interest = balance * r;
        let (principal_paid, closing) = if terms.interest_only {
            (Decimal::ZERO, terms.principal)
        } else {
            let principal_paid = payment - interest;
            (principal_paid, (balance - principal_paid).max(Decimal::ZERO))
        };

        let payment_date = terms
            .start_date
            .checked_add_months(Months::new(i))
            .ok_or_else(|| {
                RealtyCalcError::DateError(format!(
                    "payment {i} falls outside the supported date range"
                ))
            })?;

        rows.push(AmortizationRow {
            payment_number: i,
            payment_date,
            payment,
            principal: principal_paid,
            interest,
            balance: closing,
        });
        balance = closing;
    }

    Ok(rows)
}

/// Full amortization schedule with lifetime totals.
pub fn build_schedule(terms: &LoanTerms) -> RealtyCalcResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        principal = %terms.principal,
        rate_pct = %terms.annual_rate_pct,
        term_years = terms.term_years,
        interest_only = terms.interest_only,
        start_date = %terms.start_date,
        "building amortization schedule"
    );

    let schedule = generate_schedule(terms)?;

    let mut total_payments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    for row in &schedule {
        total_payments += row.payment;
        total_interest += row.interest;
        total_principal += row.principal;
    }

    // validate_loan guarantees at least twelve rows
    let last = &schedule[schedule.len() - 1];
    let monthly_payment = last.payment;
    let payoff_date = last.payment_date;

    if terms.interest_only {
        warnings.push(
            "Interest-only schedule: balance column shows the original principal, \
             which remains due at maturity"
                .into(),
        );
    }
    if terms.annual_rate_pct.is_zero() && !terms.principal.is_zero() {
        warnings.push("Zero interest rate: principal amortizes straight-line".into());
    }

    let output = ScheduleOutput {
        monthly_payment,
        total_payments,
        total_interest,
        total_principal,
        payoff_date,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Amortization Schedule",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(principal: Decimal, rate: Decimal, years: u32, io: bool) -> LoanTerms {
        LoanTerms {
            principal,
            annual_rate_pct: rate,
            term_years: years,
            interest_only: io,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_schedule_length() {
        let rows = generate_schedule(&terms(dec!(200000), dec!(6), 30, false)).unwrap();
        assert_eq!(rows.len(), 360);
        assert_eq!(rows[0].payment_number, 1);
        assert_eq!(rows[359].payment_number, 360);
    }

    #[test]
    fn test_first_row_split() {
        let rows = generate_schedule(&terms(dec!(200000), dec!(6), 30, false)).unwrap();
        // interest on 200000 at 0.5% per month
        assert_eq!(rows[0].interest, dec!(1000));
        assert!((rows[0].principal - dec!(199.10)).abs() < dec!(0.01));
        assert_eq!(rows[0].balance, dec!(200000) - rows[0].principal);
    }

    #[test]
    fn test_final_balance_near_zero() {
        let rows = generate_schedule(&terms(dec!(200000), dec!(6), 30, false)).unwrap();
        let last = rows.last().unwrap();
        assert!(last.balance.abs() < dec!(0.000001), "residual {}", last.balance);
    }

    #[test]
    fn test_principal_sums_to_loan() {
        let rows = generate_schedule(&terms(dec!(150000), dec!(4.5), 15, false)).unwrap();
        let paid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert!((paid - dec!(150000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_balance_is_previous_minus_principal() {
        let rows = generate_schedule(&terms(dec!(100000), dec!(5), 10, false)).unwrap();
        for pair in rows.windows(2).take(100) {
            assert_eq!(pair[1].balance, pair[0].balance - pair[1].principal);
        }
    }

    #[test]
    fn test_interest_only_balance_constant() {
        let rows = generate_schedule(&terms(dec!(250000), dec!(6), 5, true)).unwrap();
        assert_eq!(rows.len(), 60);
        for row in &rows {
            assert_eq!(row.balance, dec!(250000));
            assert_eq!(row.principal, Decimal::ZERO);
            assert_eq!(row.interest, dec!(1250));
            assert_eq!(row.payment, dec!(1250));
        }
    }

    #[test]
    fn test_payment_dates_advance_monthly() {
        let rows = generate_schedule(&terms(dec!(10000), dec!(5), 1, false)).unwrap();
        assert_eq!(rows[0].payment_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert_eq!(rows[11].payment_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_payment_date_clamps_to_month_end() {
        let mut t = terms(dec!(10000), dec!(5), 1, false);
        t.start_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let rows = generate_schedule(&t).unwrap();
        assert_eq!(rows[0].payment_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(rows[1].payment_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_zero_rate_schedule() {
        let rows = generate_schedule(&terms(dec!(12000), Decimal::ZERO, 1, false)).unwrap();
        assert!(rows.iter().all(|r| r.interest.is_zero() && r.principal == dec!(1000)));
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_build_schedule_totals() {
        let out = build_schedule(&terms(dec!(200000), dec!(6), 30, false)).unwrap();
        let r = &out.result;
        assert!((r.total_principal - dec!(200000)).abs() < dec!(0.000001));
        assert!((r.total_payments - r.total_interest - r.total_principal).abs() < dec!(0.000001));
        assert_eq!(r.payoff_date, NaiveDate::from_ymd_opt(2054, 1, 15).unwrap());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_build_schedule_interest_only_warning() {
        let out = build_schedule(&terms(dec!(100000), dec!(6), 2, true)).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.total_principal, Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_error() {
        assert!(generate_schedule(&terms(dec!(1000), dec!(5), 0, false)).is_err());
    }

    #[test]
    fn test_term_above_maximum_error() {
        // interest-only and zero-rate loans never reach the compounding guard
        for (rate, io) in [(dec!(5), true), (Decimal::ZERO, false)] {
            let err = generate_schedule(&terms(dec!(1000), rate, 10_000_000, io)).unwrap_err();
            assert!(
                matches!(err, RealtyCalcError::InvalidInput { ref field, .. } if field == "term_years")
            );
        }
    }

    #[test]
    fn test_maximum_term_schedule_length() {
        let rows = generate_schedule(&terms(dec!(1000), dec!(5), 100, false)).unwrap();
        assert_eq!(rows.len(), 1200);
    }
}
