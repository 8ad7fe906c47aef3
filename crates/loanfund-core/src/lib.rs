//! Financial calculation engine for loan-portfolio funds.
//!
//! Pure, synchronous computation over immutable input snapshots: interest
//! accrual on a 360-day year, bullet and reducing-balance amortization,
//! XIRR root-finding, carrying cost of undeployed capital, fund-level
//! metrics and forward cash-flow projection. Persistence, auth, HTTP and UI
//! are external collaborators; this crate consumes plain records and returns
//! computed numbers.

pub mod daycount;
pub mod error;
pub mod forecast;
pub mod interest;
pub mod loan_irr;
pub mod metrics;
pub mod schedule;
pub mod types;
pub mod undeployed;
pub mod xirr;

pub use error::LoanFundError;
pub use types::*;

/// Standard result type for all loanfund operations
pub type LoanFundResult<T> = Result<T, LoanFundError>;
