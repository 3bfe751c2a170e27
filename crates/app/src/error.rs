use thiserror::Error;

use shopbook_accounts::AccountStoreError;
use shopbook_inventory::InventoryError;
use shopbook_ledger::LedgerError;
use shopbook_reporting::ReportingError;

use crate::activity::ActivityError;
use crate::store::StoreError;

/// Errors surfaced by the application service.
///
/// Domain rejections pass through unchanged; the state they were raised
/// against is left exactly as it was.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Accounts(#[from] AccountStoreError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Reporting(#[from] ReportingError),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no customer matches {0:?}")]
    CustomerNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("shop state lock poisoned")]
    LockPoisoned,
}

pub type AppResult<T> = Result<T, AppError>;
