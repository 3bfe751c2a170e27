//! Read models over accounts, the ledger and the stock total.
//!
//! Nothing here mutates engine state; every function takes borrowed input
//! and returns a fresh view.

pub mod error;
pub mod statement;
pub mod totals;

pub use error::{ReportingError, ReportingResult};
pub use statement::{DateRange, entries_on, statement};
pub use totals::{NetPosition, Totals};
