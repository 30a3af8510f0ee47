use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::creative::{self, CreativeFinancingInput};

use super::Context;
use crate::input::{self, require};

/// Arguments for a seller-financed (creative) deal
#[derive(Args)]
pub struct CreativeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Closing costs
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    /// Rehab budget
    #[arg(long, default_value = "0")]
    pub rehab_cost: Decimal,

    /// Seller-financing rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization term in years
    #[arg(long)]
    pub amortization_years: Option<u32>,

    /// Years until the balloon falls due
    #[arg(long)]
    pub balloon_years: Option<u32>,

    /// Interest-only note
    #[arg(long)]
    pub interest_only: bool,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Monthly operating expenses
    #[arg(long, default_value = "0")]
    pub expenses: Decimal,
}

pub fn run_creative(args: CreativeArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let creative_input: CreativeFinancingInput = input::resolve(args.input.as_deref(), || {
        Ok(CreativeFinancingInput {
            purchase_price: require(args.price, "price")?,
            down_payment: args.down_payment,
            closing_costs: args.closing_costs,
            rehab_cost: args.rehab_cost,
            annual_rate_pct: require(args.rate, "rate")?,
            amortization_years: require(args.amortization_years, "amortization-years")?,
            balloon_years: require(args.balloon_years, "balloon-years")?,
            interest_only: args.interest_only,
            monthly_rent: require(args.rent, "rent")?,
            monthly_expenses: args.expenses,
        })
    })?;

    let result = creative::analyze_creative_deal(&creative_input, &ctx.config)?;
    Ok(serde_json::to_value(result)?)
}
