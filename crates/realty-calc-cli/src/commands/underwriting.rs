use clap::Args;
use serde_json::Value;

use realty_calc_core::underwriting::{self, UnderwritingInput};

use crate::input;

/// Arguments for apartment / multifamily underwriting
#[derive(Args)]
pub struct UnderwriteArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_underwrite(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let uw_input: UnderwritingInput = input::resolve(args.input.as_deref(), || {
        Err("--input <file.json> or stdin required for underwriting (rent roll)".into())
    })?;

    let result = underwriting::underwrite_property(&uw_input)?;
    Ok(serde_json::to_value(result)?)
}
