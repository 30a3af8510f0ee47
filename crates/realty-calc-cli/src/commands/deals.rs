use std::io;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use realty_calc_core::comparison::compare_deals;
use realty_calc_core::creative::{analyze_creative_deal, CreativeFinancingInput};
use realty_calc_core::mortgage::payment::calculate_payment;
use realty_calc_core::rental::cash_flow::analyze_cash_flow;
use realty_calc_core::store::{list_by_type, DealStore, DealType, JsonFileDealStore, SavedDeal};
use realty_calc_core::tax::estimate_tax;
use realty_calc_core::underwriting::underwrite_property;
use realty_calc_core::wholesale::analysis::{wholesale_analysis, WholesaleInput};
use realty_calc_core::{CalculatorConfig, RealtyCalcResult};

use super::Context;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DealTypeArg {
    Wholesale,
    CreativeFinancing,
    Mortgage,
    Apartment,
    Multifamily,
    Rental,
    Tax,
    Comparison,
}

impl From<DealTypeArg> for DealType {
    fn from(t: DealTypeArg) -> Self {
        match t {
            DealTypeArg::Wholesale => DealType::Wholesale,
            DealTypeArg::CreativeFinancing => DealType::CreativeFinancing,
            DealTypeArg::Mortgage => DealType::Mortgage,
            DealTypeArg::Apartment => DealType::Apartment,
            DealTypeArg::Multifamily => DealType::Multifamily,
            DealTypeArg::Rental => DealType::Rental,
            DealTypeArg::Tax => DealType::Tax,
            DealTypeArg::Comparison => DealType::Comparison,
        }
    }
}

/// Saved-deal management
#[derive(Args)]
pub struct DealsArgs {
    #[command(subcommand)]
    pub command: DealsCommand,
}

#[derive(Subcommand)]
pub enum DealsCommand {
    /// Run a calculator on the input and save inputs and results
    Save {
        /// Calculator the inputs belong to
        #[arg(long = "type", value_enum)]
        deal_type: DealTypeArg,
        /// Display name
        #[arg(long)]
        name: String,
        /// Path to JSON input file (else stdin)
        #[arg(long)]
        input: Option<String>,
    },
    /// List saved deals, newest first
    List {
        #[arg(long = "type", value_enum)]
        deal_type: Option<DealTypeArg>,
    },
    /// Show one saved deal
    Show { id: Uuid },
    /// Delete a saved deal
    Delete { id: Uuid },
    /// Export saved deals as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long = "type", value_enum)]
        deal_type: Option<DealTypeArg>,
    },
}

pub fn run_deals(args: DealsArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = JsonFileDealStore::new(&ctx.store_path);

    match args.command {
        DealsCommand::Save {
            deal_type,
            name,
            input: input_path,
        } => {
            let deal_type = DealType::from(deal_type);
            let inputs: Value = input::resolve(input_path.as_deref(), || {
                Err("--input <file.json> or stdin required to save a deal".into())
            })?;
            let results = calculate(deal_type, &inputs, &ctx.config)?;
            let deal = SavedDeal::new(deal_type, name, inputs, results);
            store.save(deal.clone())?;
            Ok(serde_json::to_value(deal)?)
        }
        DealsCommand::List { deal_type } => {
            let deals = select(&store, deal_type)?;
            let rows: Vec<Value> = deals
                .iter()
                .map(|d| {
                    json!({
                        "id": d.id,
                        "type": d.deal_type,
                        "name": d.name,
                        "date": d.date,
                    })
                })
                .collect();
            Ok(Value::Array(rows))
        }
        DealsCommand::Show { id } => Ok(serde_json::to_value(store.load(id)?)?),
        DealsCommand::Delete { id } => {
            store.delete(id)?;
            Ok(json!({ "deleted": id }))
        }
        DealsCommand::Export { file, deal_type } => {
            let deals = select(&store, deal_type)?;
            match file {
                Some(path) => {
                    let mut wtr = csv::Writer::from_path(&path)?;
                    write_deals_csv(&mut wtr, &deals)?;
                    Ok(json!({ "exported": deals.len(), "file": path.display().to_string() }))
                }
                None => {
                    let stdout = io::stdout();
                    let mut wtr = csv::Writer::from_writer(stdout.lock());
                    write_deals_csv(&mut wtr, &deals)?;
                    Ok(Value::Null)
                }
            }
        }
    }
}

fn select(
    store: &JsonFileDealStore,
    deal_type: Option<DealTypeArg>,
) -> RealtyCalcResult<Vec<SavedDeal>> {
    match deal_type {
        Some(t) => list_by_type(store, t.into()),
        None => store.list(),
    }
}

/// Re-run the calculator for `deal_type` so saved results always match the
/// saved inputs.
fn calculate(
    deal_type: DealType,
    inputs: &Value,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    fn run<T, R, F>(inputs: &Value, f: F) -> Result<Value, Box<dyn std::error::Error>>
    where
        T: DeserializeOwned,
        R: Serialize,
        F: FnOnce(&T) -> RealtyCalcResult<R>,
    {
        let typed: T = serde_json::from_value(inputs.clone())?;
        let output = serde_json::to_value(f(&typed)?)?;
        Ok(output.get("result").cloned().unwrap_or(output))
    }

    match deal_type {
        DealType::Wholesale => run(inputs, |i: &WholesaleInput| wholesale_analysis(i, config)),
        DealType::CreativeFinancing => {
            run(inputs, |i: &CreativeFinancingInput| analyze_creative_deal(i, config))
        }
        DealType::Mortgage => run(inputs, calculate_payment),
        DealType::Apartment | DealType::Multifamily => run(inputs, underwrite_property),
        DealType::Rental => run(inputs, analyze_cash_flow),
        DealType::Tax => run(inputs, estimate_tax),
        DealType::Comparison => run(inputs, compare_deals),
    }
}

fn write_deals_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    deals: &[SavedDeal],
) -> Result<(), Box<dyn std::error::Error>> {
    wtr.write_record(["id", "type", "name", "date", "inputs", "results"])?;
    for d in deals {
        wtr.write_record([
            d.id.to_string(),
            d.deal_type.to_string(),
            d.name.clone(),
            d.date.to_rfc3339(),
            serde_json::to_string(&d.inputs)?,
            serde_json::to_string(&d.results)?,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
