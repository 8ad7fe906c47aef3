pub mod fund;
pub mod irr;
pub mod schedule;
