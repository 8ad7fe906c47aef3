use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanFundError;
use crate::LoanFundResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates expressed as whole percentages (13.5 = 13.5% p.a.), matching
/// the stored records. Solver results are decimal fractions (0.268 = 26.8%)
/// and are documented as such where they appear.
pub type Rate = Decimal;

/// Whole-day counts
pub type Days = i64;

/// A named percentage-of-principal cost item (e.g. broker fee).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub name: String,
    /// 0-100
    pub percentage: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Closed,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepaymentType {
    Bullet,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
}

/// One scheduled payment of a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub due_date: NaiveDate,
    /// Total due: principal component + interest component.
    pub amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub status: InstallmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub fund_id: String,
    pub borrower_name: String,
    pub principal: Money,
    /// % p.a.
    pub interest_rate: Rate,
    /// One-time fee, % of principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee_rate: Option<Rate>,
    pub start_date: NaiveDate,
    /// Tenure in days.
    pub duration_days: Days,
    pub status: LoanStatus,
    pub repayment_type: RepaymentType,
    #[serde(default)]
    pub variable_costs: Vec<CostItem>,
    #[serde(default)]
    pub installments: Vec<Installment>,
    /// Amount marked as NPL (partial or full write-off), <= principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaulted_amount: Option<Money>,
}

/// A tranche-wise capital contribution to a fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalRaise {
    pub id: String,
    pub amount: Money,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    pub name: String,
    pub total_raised: Money,
    /// % p.a.
    pub cost_of_capital_rate: Rate,
    /// Inception date.
    pub created_at: NaiveDate,
    #[serde(default)]
    pub capital_raises: Vec<CapitalRaise>,
}

/// A single dated, signed cash flow (outflows negative). Solver input only,
/// constructed per calculation and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Money,
}

// ---------------------------------------------------------------------------
// Boundary validation
// ---------------------------------------------------------------------------

/// Components must reconcile to the installment amount up to rounding.
const INSTALLMENT_RECONCILE_TOLERANCE: Decimal = rust_decimal_macros::dec!(0.01);

pub fn validate_fund(fund: &Fund) -> LoanFundResult<()> {
    if fund.total_raised < Decimal::ZERO {
        return Err(LoanFundError::InvalidInput {
            field: "totalRaised".into(),
            reason: "Total raised cannot be negative".into(),
        });
    }
    if fund.cost_of_capital_rate < Decimal::ZERO {
        return Err(LoanFundError::InvalidInput {
            field: "costOfCapitalRate".into(),
            reason: "Cost of capital rate cannot be negative".into(),
        });
    }

    let mut explicit = Decimal::ZERO;
    for raise in &fund.capital_raises {
        if raise.amount <= Decimal::ZERO {
            return Err(LoanFundError::InvalidInput {
                field: "capitalRaises".into(),
                reason: format!("Raise '{}' must have a positive amount", raise.id),
            });
        }
        explicit += raise.amount;
    }
    if explicit > fund.total_raised {
        return Err(LoanFundError::InvalidInput {
            field: "capitalRaises".into(),
            reason: "Sum of capital raises exceeds totalRaised".into(),
        });
    }

    Ok(())
}

pub fn validate_loan(loan: &Loan) -> LoanFundResult<()> {
    if loan.principal <= Decimal::ZERO {
        return Err(LoanFundError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if loan.interest_rate < Decimal::ZERO {
        return Err(LoanFundError::InvalidInput {
            field: "interestRate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if loan.duration_days <= 0 {
        return Err(LoanFundError::InvalidInput {
            field: "durationDays".into(),
            reason: "Duration must be at least one day".into(),
        });
    }
    if let Some(fee) = loan.processing_fee_rate {
        if fee < Decimal::ZERO {
            return Err(LoanFundError::InvalidInput {
                field: "processingFeeRate".into(),
                reason: "Processing fee rate cannot be negative".into(),
            });
        }
    }
    if let Some(defaulted) = loan.defaulted_amount {
        if defaulted < Decimal::ZERO || defaulted > loan.principal {
            return Err(LoanFundError::InvalidInput {
                field: "defaultedAmount".into(),
                reason: "Defaulted amount must be between 0 and principal".into(),
            });
        }
    }
    for cost in &loan.variable_costs {
        if cost.percentage < Decimal::ZERO {
            return Err(LoanFundError::InvalidInput {
                field: "variableCosts".into(),
                reason: format!("Cost item '{}' cannot be negative", cost.name),
            });
        }
    }
    if loan.repayment_type == RepaymentType::Bullet && loan.installments.len() > 1 {
        return Err(LoanFundError::InvalidInput {
            field: "installments".into(),
            reason: "A bullet loan carries at most one installment".into(),
        });
    }
    for inst in &loan.installments {
        let drift =
            (inst.principal_component + inst.interest_component - inst.amount).abs();
        if drift > INSTALLMENT_RECONCILE_TOLERANCE {
            return Err(LoanFundError::InvalidInput {
                field: "installments".into(),
                reason: format!(
                    "Installment due {} does not reconcile: {} + {} != {}",
                    inst.due_date, inst.principal_component, inst.interest_component, inst.amount
                ),
            });
        }
    }

    Ok(())
}
