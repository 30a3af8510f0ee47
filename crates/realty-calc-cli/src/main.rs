mod commands;
mod input;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use commands::comparison::CompareArgs;
use commands::creative::CreativeArgs;
use commands::deals::DealsArgs;
use commands::mortgage::{BalloonArgs, PaymentArgs, ScheduleArgs};
use commands::rental::{CashFlowArgs, CriteriaArgs, RentalStrategiesArgs};
use commands::tax::TaxArgs;
use commands::underwriting::UnderwriteArgs;
use commands::wholesale::{ExitPctArgs, WholesaleArgs};
use commands::Context;
use realty_calc_core::CalculatorConfig;

/// Real-estate investment calculations
#[derive(Parser)]
#[command(
    name = "rcalc",
    version,
    about = "Real-estate investment calculations",
    long_about = "A CLI for real-estate deal analysis with decimal precision. Covers \
                  mortgage payments and amortization, balloon balances, rental cash flow, \
                  deal criteria, wholesale offers, creative financing, multifamily \
                  underwriting, tax estimates and saved deals."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file overriding criteria thresholds, exit tiers and the rehab table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Saved-deal file
    #[arg(long, global = true, env = "REALTY_CALC_STORE", default_value = "deals.json")]
    store: PathBuf,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly mortgage payment and lifetime totals
    Payment(PaymentArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Remaining balance when a balloon falls due
    Balloon(BalloonArgs),
    /// Monthly/annual cash flow and cash-on-cash return
    CashFlow(CashFlowArgs),
    /// Check a deal against the investment criteria
    Criteria(CriteriaArgs),
    /// Exit percentage and preferred exit price for an ARV
    ExitPct(ExitPctArgs),
    /// Wholesale maximum allowable offer
    Wholesale(WholesaleArgs),
    /// Seller-financed deal with balloon and criteria check
    Creative(CreativeArgs),
    /// Multifamily / apartment underwriting (NOI, cap rate, DSCR)
    Underwrite(UnderwriteArgs),
    /// Rank long-term, mid-term and short-term rental strategies
    RentalStrategies(RentalStrategiesArgs),
    /// Depreciation and rental income tax estimate
    Tax(TaxArgs),
    /// Compare and rank several deals
    Compare(CompareArgs),
    /// Save, list, show, delete and export saved deals
    Deals(DealsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(CalculatorConfig::load(p)?),
        None => Ok(CalculatorConfig::default()),
    }
}

fn run(command: Commands, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Balloon(args) => commands::mortgage::run_balloon(args),
        Commands::CashFlow(args) => commands::rental::run_cash_flow(args),
        Commands::Criteria(args) => commands::rental::run_criteria(args, ctx),
        Commands::ExitPct(args) => commands::wholesale::run_exit_pct(args, ctx),
        Commands::Wholesale(args) => commands::wholesale::run_wholesale(args, ctx),
        Commands::Creative(args) => commands::creative::run_creative(args, ctx),
        Commands::Underwrite(args) => commands::underwriting::run_underwrite(args),
        Commands::RentalStrategies(args) => commands::rental::run_rental_strategies(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::Deals(args) => commands::deals::run_deals(args, ctx),
        Commands::Version => Ok(Value::String(format!(
            "rcalc {}",
            env!("CARGO_PKG_VERSION")
        ))),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|config| {
        let ctx = Context {
            config,
            store_path: cli.store.clone(),
        };
        run(cli.command, &ctx)
    });

    match result {
        Ok(Value::Null) => process::exit(0),
        Ok(Value::String(s)) => {
            println!("{}", s);
            process::exit(0);
        }
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
