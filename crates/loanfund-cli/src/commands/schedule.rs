use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loanfund_core::schedule::generate_schedule;
use loanfund_core::types::RepaymentType;

use crate::input;

/// Arguments for repayment schedule generation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate, as a percentage (e.g. 24 for 24%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Loan tenure in days
    #[arg(long)]
    pub duration_days: Option<i64>,

    /// Repayment type: bullet or monthly
    #[arg(long, default_value = "bullet")]
    pub repayment_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    principal: Decimal,
    interest_rate: Decimal,
    start_date: NaiveDate,
    duration_days: i64,
    repayment_type: RepaymentType,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ScheduleRequest = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduleRequest {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
            duration_days: args
                .duration_days
                .ok_or("--duration-days is required (or provide --input)")?,
            repayment_type: parse_repayment_type(&args.repayment_type)?,
        }
    };

    let schedule = generate_schedule(
        request.principal,
        request.interest_rate,
        request.start_date,
        request.duration_days,
        request.repayment_type,
    )?;
    Ok(serde_json::to_value(schedule)?)
}

fn parse_repayment_type(raw: &str) -> Result<RepaymentType, Box<dyn std::error::Error>> {
    match raw.to_ascii_lowercase().as_str() {
        "bullet" => Ok(RepaymentType::Bullet),
        "monthly" => Ok(RepaymentType::Monthly),
        other => Err(format!("Unknown repayment type '{}': expected bullet or monthly", other).into()),
    }
}
