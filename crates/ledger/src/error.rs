use thiserror::Error;

use shopbook_core::{AccountId, DomainError};

/// Validation failures of the ledger engine.
///
/// None of these are fatal: the caller reports the rejected action and the
/// state it passed in is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is non-numeric, non-finite, or not strictly positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The request targets an account not present in the supplied set.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// The transaction kind is not one of the four request kinds.
    #[error("unknown transaction kind: {0:?}")]
    UnknownKind(String),

    /// Netting would push a balance past the largest representable amount.
    #[error("balance of account {0} would overflow")]
    BalanceOverflow(AccountId),

    #[error("unknown overpay policy: {0:?}")]
    UnknownPolicy(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Amount validation failures from `shopbook_core::Amount`.
impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                LedgerError::InvalidAmount(msg)
            }
            other => LedgerError::InvalidAmount(other.to_string()),
        }
    }
}
