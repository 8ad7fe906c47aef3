use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};

use loanfund_core::forecast::compute_cash_flow_forecast;
use loanfund_core::metrics::compute_fund_metrics;
use loanfund_core::types::{Fund, Loan};
use loanfund_core::undeployed::undeployed_capital_cost;

use crate::input;

/// Arguments for the undeployed-capital cost calculation
#[derive(Args)]
pub struct UndeployedCostArgs {
    /// Path to a JSON file with `fund`, `loans` and optional `asOf`
    #[arg(long)]
    pub input: Option<String>,

    /// Accrue through this date (YYYY-MM-DD); overrides the input field
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for fund metrics
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a JSON file with `fund`, `loans` and optional `asOf`
    #[arg(long)]
    pub input: Option<String>,

    /// Report as of this date (YYYY-MM-DD); overrides the input field
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for the cash-flow forecast
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to a JSON file with `fund`, `loans` and optional `today`
    #[arg(long)]
    pub input: Option<String>,

    /// Forecast horizon in calendar months; overrides the input field
    /// (12 when neither is given)
    #[arg(long)]
    pub horizon_months: Option<u32>,

    /// Projection start date (YYYY-MM-DD); overrides the input field
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioRequest {
    fund: Fund,
    #[serde(default)]
    loans: Vec<Loan>,
    as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastRequest {
    fund: Fund,
    #[serde(default)]
    loans: Vec<Loan>,
    horizon_months: Option<u32>,
    today: Option<NaiveDate>,
}

fn read_request<T: serde::de::DeserializeOwned>(
    input_path: &Option<String>,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        input::read_json(path)
    } else if let Some(data) = input::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input file (or piped JSON) is required".into())
    }
}

pub fn run_undeployed_cost(args: UndeployedCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PortfolioRequest = read_request(&args.input)?;
    let as_of = args
        .as_of
        .or(request.as_of)
        .ok_or("--as-of is required (or an `asOf` field in the input)")?;

    let cost = undeployed_capital_cost(&request.fund, &request.loans, as_of)?;
    Ok(json!({
        "fundId": request.fund.id,
        "asOf": as_of,
        "accumulatedCost": cost,
    }))
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PortfolioRequest = read_request(&args.input)?;
    let as_of = args
        .as_of
        .or(request.as_of)
        .ok_or("--as-of is required (or an `asOf` field in the input)")?;

    let metrics = compute_fund_metrics(&request.fund, &request.loans, as_of)?;
    Ok(serde_json::to_value(metrics)?)
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ForecastRequest = read_request(&args.input)?;
    let today = args
        .today
        .or(request.today)
        .ok_or("--today is required (or a `today` field in the input)")?;
    let horizon = resolve_horizon(args.horizon_months, request.horizon_months);

    let forecast = compute_cash_flow_forecast(&request.fund, &request.loans, horizon, today)?;
    Ok(serde_json::to_value(forecast)?)
}

const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Flag wins over the input field, matching the `--as-of`/`--today` options.
fn resolve_horizon(flag: Option<u32>, from_input: Option<u32>) -> u32 {
    flag.or(from_input).unwrap_or(DEFAULT_HORIZON_MONTHS)
}
