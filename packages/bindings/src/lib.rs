use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use loanfund_core::types::{Fund, Loan, RepaymentType};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_date(raw: &str) -> NapiResult<NaiveDate> {
    raw.parse().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    principal: rust_decimal::Decimal,
    interest_rate: rust_decimal::Decimal,
    start_date: NaiveDate,
    duration_days: i64,
    repayment_type: RepaymentType,
}

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = loanfund_core::schedule::generate_schedule(
        request.principal,
        request.interest_rate,
        request.start_date,
        request.duration_days,
        request.repayment_type,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// IRR
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_irr(loan_json: String) -> NapiResult<String> {
    let loan: Loan = serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    let rate = loanfund_core::loan_irr::loan_irr(&loan).map_err(to_napi_error)?;
    serde_json::to_string(&rate).map_err(to_napi_error)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetIrrRequest {
    loan: Loan,
    cost_of_capital_rate: rust_decimal::Decimal,
}

#[napi]
pub fn loan_net_irr(input_json: String) -> NapiResult<String> {
    let request: NetIrrRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rate = loanfund_core::loan_irr::loan_net_irr(&request.loan, request.cost_of_capital_rate)
        .map_err(to_napi_error)?;
    serde_json::to_string(&rate).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fund analytics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioRequest {
    fund: Fund,
    #[serde(default)]
    loans: Vec<Loan>,
}

#[napi]
pub fn undeployed_cost(input_json: String, as_of: String) -> NapiResult<String> {
    let request: PortfolioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let cost = loanfund_core::undeployed::undeployed_capital_cost(
        &request.fund,
        &request.loans,
        parse_date(&as_of)?,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&cost).map_err(to_napi_error)
}

#[napi]
pub fn fund_metrics(input_json: String, as_of: String) -> NapiResult<String> {
    let request: PortfolioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let metrics = loanfund_core::metrics::compute_fund_metrics(
        &request.fund,
        &request.loans,
        parse_date(&as_of)?,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

#[napi]
pub fn cash_flow_forecast(
    input_json: String,
    horizon_months: u32,
    today: String,
) -> NapiResult<String> {
    let request: PortfolioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let forecast = loanfund_core::forecast::compute_cash_flow_forecast(
        &request.fund,
        &request.loans,
        horizon_months,
        parse_date(&today)?,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&forecast).map_err(to_napi_error)
}
