mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::fund::{ForecastArgs, MetricsArgs, UndeployedCostArgs};
use commands::irr::{IrrArgs, NetIrrArgs};
use commands::schedule::ScheduleArgs;

/// Loan-portfolio fund analytics
#[derive(Parser)]
#[command(
    name = "lfa",
    version,
    about = "Loan-portfolio fund analytics",
    long_about = "A CLI for loan-portfolio fund analytics with decimal precision. \
                  Supports repayment schedule generation, gross and net loan IRR, \
                  undeployed-capital carrying cost, fund metrics, and forward \
                  cash-flow forecasting."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a repayment schedule (bullet or monthly EMI)
    Schedule(ScheduleArgs),
    /// Annualized IRR of a loan's expected cash flows
    Irr(IrrArgs),
    /// Loan IRR net of funding cost and upfront costs
    NetIrr(NetIrrArgs),
    /// Accrued carrying cost of undeployed capital
    UndeployedCost(UndeployedCostArgs),
    /// Fund-level portfolio metrics
    Metrics(MetricsArgs),
    /// Forward cash-flow forecast
    Forecast(ForecastArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Irr(args) => commands::irr::run_irr(args),
        Commands::NetIrr(args) => commands::irr::run_net_irr(args),
        Commands::UndeployedCost(args) => commands::fund::run_undeployed_cost(args),
        Commands::Metrics(args) => commands::fund::run_metrics(args),
        Commands::Forecast(args) => commands::fund::run_forecast(args),
        Commands::Version => {
            println!("lfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
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
