use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use realty_calc_core::wholesale::analysis::{self, WholesaleInput};
use realty_calc_core::wholesale::exit;
use realty_calc_core::wholesale::rehab::RehabCondition;

use super::Context;
use crate::input::{self, require};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConditionArg {
    Easy,
    Medium,
    Bad,
}

impl From<ConditionArg> for RehabCondition {
    fn from(c: ConditionArg) -> Self {
        match c {
            ConditionArg::Easy => RehabCondition::Easy,
            ConditionArg::Medium => RehabCondition::Medium,
            ConditionArg::Bad => RehabCondition::Bad,
        }
    }
}

/// Arguments for the exit-percentage lookup
#[derive(Args)]
pub struct ExitPctArgs {
    /// After-repair value
    #[arg(long)]
    pub arv: Decimal,
}

/// Arguments for the wholesale MAO calculator
#[derive(Args)]
pub struct WholesaleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Manual rehab estimate
    #[arg(long, default_value = "0")]
    pub rehab_cost: Decimal,

    /// Holding costs
    #[arg(long, default_value = "0")]
    pub holding_cost: Decimal,

    /// Closing costs
    #[arg(long, default_value = "0")]
    pub closing_cost: Decimal,

    /// Assignment fee override
    #[arg(long, default_value = "0")]
    pub fee: Decimal,

    /// Square footage; estimates rehab from the flat-rate table
    #[arg(long, default_value = "0")]
    pub sqft: Decimal,

    /// Property condition for the square-footage estimate
    #[arg(long, value_enum, default_value = "medium")]
    pub condition: ConditionArg,
}

pub fn run_exit_pct(args: ExitPctArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    if args.arv < Decimal::ZERO {
        return Err("--arv must not be negative".into());
    }
    let tiers = &ctx.config.exit_tiers;
    Ok(json!({
        "arv": args.arv,
        "exit_percentage": exit::exit_percentage(args.arv, tiers),
        "preferred_exit_price": exit::preferred_exit_price(args.arv, tiers),
    }))
}

pub fn run_wholesale(args: WholesaleArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let wholesale_input: WholesaleInput = input::resolve(args.input.as_deref(), || {
        Ok(WholesaleInput {
            arv: require(args.arv, "arv")?,
            rehab_cost: args.rehab_cost,
            holding_cost: args.holding_cost,
            closing_cost: args.closing_cost,
            user_fee: args.fee,
            square_footage: args.sqft,
            condition: args.condition.into(),
            rehab_items: Vec::new(),
        })
    })?;

    let result = analysis::wholesale_analysis(&wholesale_input, &ctx.config)?;
    Ok(serde_json::to_value(result)?)
}
