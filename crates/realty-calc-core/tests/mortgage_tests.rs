use chrono::NaiveDate;
use proptest::prelude::*;
use realty_calc_core::mortgage::amortization::{build_schedule, generate_schedule, LoanTerms};
use realty_calc_core::mortgage::balloon::balloon_balance;
use realty_calc_core::mortgage::payment::{interest_only_payment, monthly_payment};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn terms(principal: Decimal, rate: Decimal, years: u32, interest_only: bool) -> LoanTerms {
    LoanTerms {
        principal,
        annual_rate_pct: rate,
        term_years: years,
        interest_only,
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
}

// ===========================================================================
// Known answers
// ===========================================================================

#[test]
fn test_payment_200k_6pct_30yr() {
    let pmt = monthly_payment(dec!(200000), dec!(6), 30).unwrap();
    assert_eq!(pmt.round_dp(2), dec!(1199.10));
}

#[test]
fn test_payment_15yr_known_answer() {
    // 300k at 5% over 15 years ≈ 2372.38
    let pmt = monthly_payment(dec!(300000), dec!(5), 15).unwrap();
    assert_eq!(pmt.round_dp(2), dec!(2372.38));
}

#[test]
fn test_schedule_totals_match_payment_times_months() {
    let out = build_schedule(&terms(dec!(200000), dec!(6), 30, false)).unwrap();
    let r = &out.result;
    assert_eq!(r.schedule.len(), 360);
    let expected = r.monthly_payment * Decimal::from(360);
    assert!((r.total_payments - expected).abs() < dec!(0.000001));
    // lifetime interest on the classic example ≈ 231,676
    assert!((r.total_interest - dec!(231676.38)).abs() < dec!(0.01));
}

#[test]
fn test_balloon_matches_schedule_row() {
    let rows = generate_schedule(&terms(dec!(180000), dec!(4.25), 25, false)).unwrap();
    let bal = balloon_balance(dec!(180000), dec!(4.25), 25, 10, false).unwrap();
    assert_eq!(bal, rows[119].balance);
}

#[test]
fn test_interest_only_rows_pay_interest_only_payment() {
    let rows = generate_schedule(&terms(dec!(420000), dec!(7.5), 3, true)).unwrap();
    let expected = interest_only_payment(dec!(420000), dec!(7.5));
    assert_eq!(expected, dec!(2625));
    assert!(rows.iter().all(|r| r.payment == expected && r.balance == dec!(420000)));
}

// ===========================================================================
// Invariants
// ===========================================================================

fn loan_strategy() -> impl Strategy<Value = (Decimal, Decimal, u32)> {
    (1_000u32..2_000_000, 1u32..2_000, 1u32..=40).prop_map(|(p, r, n)| {
        (Decimal::from(p), Decimal::new(i64::from(r), 2), n)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_zero_principal_zero_payment(rate in 0u32..3_000, years in 1u32..=40) {
        let pmt = monthly_payment(Decimal::ZERO, Decimal::new(i64::from(rate), 2), years).unwrap();
        prop_assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn prop_zero_rate_is_exact_division(p in 1u32..5_000_000, years in 1u32..=40) {
        let principal = Decimal::from(p);
        let pmt = monthly_payment(principal, Decimal::ZERO, years).unwrap();
        prop_assert_eq!(pmt, principal / Decimal::from(years * 12));
    }

    #[test]
    fn prop_amortizing_schedule_pays_off((principal, rate, years) in loan_strategy()) {
        let rows = generate_schedule(&terms(principal, rate, years, false)).unwrap();
        prop_assert_eq!(rows.len() as u32, years * 12);

        let last = rows.last().unwrap();
        prop_assert!(last.balance.abs() < dec!(0.0001), "residual {}", last.balance);

        let paid: Decimal = rows.iter().map(|r| r.principal).sum();
        prop_assert!((paid - principal).abs() < dec!(0.0001), "paid {} of {}", paid, principal);

        prop_assert!(rows.iter().all(|r| r.balance >= Decimal::ZERO));
    }

    #[test]
    fn prop_balloon_at_full_term_is_zero((principal, rate, years) in loan_strategy()) {
        let bal = balloon_balance(principal, rate, years, years, false).unwrap();
        prop_assert!(bal.abs() < dec!(0.0001));
    }

    #[test]
    fn prop_interest_only_balance_constant((principal, rate, years) in loan_strategy()) {
        let rows = generate_schedule(&terms(principal, rate, years, true)).unwrap();
        prop_assert!(rows.iter().all(|r| r.balance == principal && r.principal.is_zero()));
    }

    #[test]
    fn prop_payment_non_negative((principal, rate, years) in loan_strategy()) {
        prop_assert!(monthly_payment(principal, rate, years).unwrap() >= Decimal::ZERO);
    }
}
