use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::tax::{self, PropertyClass, TaxInput};

use crate::input::{self, require};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PropertyClassArg {
    Residential,
    Commercial,
}

impl From<PropertyClassArg> for PropertyClass {
    fn from(c: PropertyClassArg) -> Self {
        match c {
            PropertyClassArg::Residential => PropertyClass::Residential,
            PropertyClassArg::Commercial => PropertyClass::Commercial,
        }
    }
}

/// Arguments for the rental tax estimate
#[derive(Args)]
pub struct TaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Land value (not depreciable)
    #[arg(long, default_value = "0")]
    pub land_value: Decimal,

    /// Capital improvements added to the basis
    #[arg(long, default_value = "0")]
    pub improvements: Decimal,

    /// Depreciation class
    #[arg(long, value_enum, default_value = "residential")]
    pub class: PropertyClassArg,

    /// Annual rental income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Annual operating expenses
    #[arg(long, default_value = "0")]
    pub expenses: Decimal,

    /// Annual mortgage interest paid
    #[arg(long, default_value = "0")]
    pub interest: Decimal,

    /// Annual loan principal paid
    #[arg(long, default_value = "0")]
    pub principal_paid: Decimal,

    /// Marginal tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: TaxInput = input::resolve(args.input.as_deref(), || {
        Ok(TaxInput {
            purchase_price: require(args.price, "price")?,
            land_value: args.land_value,
            capital_improvements: args.improvements,
            property_class: args.class.into(),
            annual_rental_income: require(args.income, "income")?,
            annual_operating_expenses: args.expenses,
            annual_mortgage_interest: args.interest,
            annual_principal_paid: args.principal_paid,
            marginal_tax_rate_pct: require(args.tax_rate, "tax-rate")?,
        })
    })?;

    let result = tax::estimate_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}
