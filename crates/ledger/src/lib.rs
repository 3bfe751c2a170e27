//! Ledger reconciliation engine.
//!
//! Pure domain logic only: no IO, no persistence concerns. The engine takes
//! the current accounts and ledger plus one request and returns new state;
//! the caller decides when (and whether) to persist it.

pub mod engine;
pub mod entry;
pub mod error;
pub mod kind;
pub mod request;

pub use engine::{Applied, OverpayPolicy, Posting, apply, post};
pub use entry::LedgerEntry;
pub use error::{LedgerError, LedgerResult};
pub use kind::{AuxiliaryKind, EntryKind, RequestKind};
pub use request::TransactionRequest;
