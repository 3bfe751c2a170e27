use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopbook_core::{AccountId, Amount};

use crate::error::{LedgerError, LedgerResult};
use crate::kind::RequestKind;

/// A validated request to move money on one account.
///
/// Construction performs the amount and kind checks, so a value of this type
/// can only fail in the engine with [`LedgerError::UnknownAccount`] or
/// [`LedgerError::BalanceOverflow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub account_id: AccountId,
    pub kind: RequestKind,
    pub amount: Amount,
    /// Calendar day stamped on every entry produced by this request.
    pub date: NaiveDate,
}

impl TransactionRequest {
    pub fn new(account_id: AccountId, kind: RequestKind, amount: Amount, date: NaiveDate) -> Self {
        Self {
            account_id,
            kind,
            amount,
            date,
        }
    }

    /// Build a request from raw form input (kind label and amount text).
    pub fn parse(
        account_id: AccountId,
        kind: &str,
        amount: &str,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        let amount = Amount::parse(amount)?;
        let kind = kind.parse::<RequestKind>()?;
        Ok(Self::new(account_id, kind, amount, date))
    }

    /// Build a request from a decimal amount, rejecting `<= 0`.
    pub fn with_decimal(
        account_id: AccountId,
        kind: RequestKind,
        amount: Decimal,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        Ok(Self::new(account_id, kind, Amount::new(amount)?, date))
    }

    /// Build a request from a float amount, rejecting NaN, infinities and `<= 0`.
    pub fn with_f64(
        account_id: AccountId,
        kind: RequestKind,
        amount: f64,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        Ok(Self::new(account_id, kind, Amount::from_f64(amount)?, date))
    }
}
