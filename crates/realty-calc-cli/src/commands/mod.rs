pub mod comparison;
pub mod creative;
pub mod deals;
pub mod mortgage;
pub mod rental;
pub mod tax;
pub mod underwriting;
pub mod wholesale;

use std::path::PathBuf;

use realty_calc_core::CalculatorConfig;

/// Settings shared by every subcommand.
pub struct Context {
    pub config: CalculatorConfig,
    pub store_path: PathBuf,
}
