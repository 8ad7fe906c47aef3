use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use loanfund_core::loan_irr::{loan_irr, loan_net_irr};
use loanfund_core::types::Loan;

use crate::input;

/// Arguments for gross loan IRR
#[derive(Args)]
pub struct IrrArgs {
    /// Path to a JSON file holding the loan record
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for net loan IRR
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct NetIrrArgs {
    /// Path to a JSON file holding the loan record, or a request object
    /// with `loan` and `costOfCapitalRate` fields
    #[arg(long)]
    pub input: Option<String>,

    /// Fund cost-of-capital rate, as a percentage (e.g. 13.5)
    #[arg(long)]
    pub cost_of_capital_rate: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetIrrRequest {
    loan: Loan,
    cost_of_capital_rate: Decimal,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file (or piped loan JSON) is required".into());
    };

    let rate = loan_irr(&loan)?;
    Ok(json!({ "loanId": loan.id, "irr": rate }))
}

pub fn run_net_irr(args: NetIrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        data
    } else {
        return Err("--input file (or piped JSON) is required".into());
    };

    // Accept either a full request object or a bare loan plus the rate flag
    let request: NetIrrRequest = if raw.get("loan").is_some() {
        serde_json::from_value(raw)?
    } else {
        NetIrrRequest {
            loan: serde_json::from_value(raw)?,
            cost_of_capital_rate: args
                .cost_of_capital_rate
                .ok_or("--cost-of-capital-rate is required when the input is a bare loan")?,
        }
    };

    let rate = loan_net_irr(&request.loan, request.cost_of_capital_rate)?;
    Ok(json!({ "loanId": request.loan.id, "netIrr": rate }))
}
