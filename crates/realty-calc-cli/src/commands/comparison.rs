use clap::Args;
use serde_json::Value;

use realty_calc_core::comparison::{self, DealComparisonInput};

use crate::input;

/// Arguments for the deal comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: DealComparisonInput = input::resolve(args.input.as_deref(), || {
        Err("--input <file.json> or stdin required for deal comparison".into())
    })?;

    let result = comparison::compare_deals(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}
