use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::rental::cash_flow::{self, CashFlowInputs};
use realty_calc_core::rental::criteria::{self, CriteriaMetrics};
use realty_calc_core::rental::strategy::{self, RentalStrategyInput};

use super::Context;
use crate::input::{self, require};

/// Arguments for the cash-flow calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashFlowArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly revenue (rent and other income)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Monthly operating expenses
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// Monthly debt service
    #[arg(long, default_value = "0")]
    pub debt_service: Decimal,

    /// Total cash invested
    #[arg(long, default_value = "0")]
    pub invested: Decimal,
}

/// Arguments for the deal criteria check
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CriteriaArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly cash flow
    #[arg(long)]
    pub cash_flow: Option<Decimal>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cash-on-cash return in percent; omit when undefined
    #[arg(long)]
    pub coc: Option<Decimal>,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Interest rate in percent
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Years until the balloon falls due
    #[arg(long, default_value_t = 0)]
    pub balloon_years: u32,
}

/// Arguments for the rental strategy comparison
#[derive(Args)]
pub struct RentalStrategiesArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: CashFlowInputs = input::resolve(args.input.as_deref(), || {
        Ok(CashFlowInputs {
            monthly_revenue: require(args.revenue, "revenue")?,
            monthly_expenses: require(args.expenses, "expenses")?,
            monthly_debt_service: args.debt_service,
            total_cash_invested: args.invested,
        })
    })?;

    let result = cash_flow::analyze_cash_flow(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_criteria(args: CriteriaArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let metrics: CriteriaMetrics = input::resolve(args.input.as_deref(), || {
        Ok(CriteriaMetrics {
            monthly_cash_flow: require(args.cash_flow, "cash-flow")?,
            purchase_price: require(args.price, "price")?,
            cash_on_cash_return_pct: args.coc,
            down_payment: args.down_payment,
            interest_rate_pct: args.rate,
            balloon_years: args.balloon_years,
        })
    })?;

    let result = criteria::evaluate_criteria(&metrics, &ctx.config.criteria)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rental_strategies(
    args: RentalStrategiesArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let strategy_input: RentalStrategyInput = input::resolve(args.input.as_deref(), || {
        Err("--input <file.json> or stdin required for rental strategy comparison".into())
    })?;

    let result = strategy::compare_rental_strategies(&strategy_input)?;
    Ok(serde_json::to_value(result)?)
}
