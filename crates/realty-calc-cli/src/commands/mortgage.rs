use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::mortgage::amortization::{self, LoanTerms};
use realty_calc_core::mortgage::balloon::{self, BalloonInput};
use realty_calc_core::mortgage::payment::{self, PaymentInput};

use crate::input::{self, require};

/// Arguments for the mortgage payment calculator
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (6 = 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Interest-only loan
    #[arg(long)]
    pub interest_only: bool,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Interest-only loan
    #[arg(long)]
    pub interest_only: bool,

    /// Loan start date (YYYY-MM-DD); first payment is one month later
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for balloon balance analysis
#[derive(Args)]
pub struct BalloonArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Year at whose end the balance falls due
    #[arg(long)]
    pub balloon_year: Option<u32>,

    /// Interest-only loan
    #[arg(long)]
    pub interest_only: bool,

    /// Loan start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = input::resolve(args.input.as_deref(), || {
        Ok(PaymentInput {
            principal: require(args.principal, "principal")?,
            annual_rate_pct: require(args.rate, "rate")?,
            term_years: require(args.years, "years")?,
            interest_only: args.interest_only,
        })
    })?;

    let result = payment::calculate_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = input::resolve(args.input.as_deref(), || {
        Ok(LoanTerms {
            principal: require(args.principal, "principal")?,
            annual_rate_pct: require(args.rate, "rate")?,
            term_years: require(args.years, "years")?,
            interest_only: args.interest_only,
            start_date: args
                .start_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        })
    })?;

    let result = amortization::build_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_balloon(args: BalloonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let balloon_input: BalloonInput = input::resolve(args.input.as_deref(), || {
        Ok(BalloonInput {
            principal: require(args.principal, "principal")?,
            annual_rate_pct: require(args.rate, "rate")?,
            term_years: require(args.years, "years")?,
            balloon_year: require(args.balloon_year, "balloon-year")?,
            interest_only: args.interest_only,
            start_date: args.start_date,
        })
    })?;

    let result = balloon::calculate_balloon(&balloon_input)?;
    Ok(serde_json::to_value(result)?)
}
