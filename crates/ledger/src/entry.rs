use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopbook_core::{AccountId, Amount};

use crate::kind::EntryKind;

/// One immutable line of the append-only ledger.
///
/// The account name is copied at write time so history reads the same after
/// the account is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    account_id: AccountId,
    account_name: String,
    kind: EntryKind,
    amount: Amount,
    date: NaiveDate,
}

impl LedgerEntry {
    pub fn new(
        account_id: AccountId,
        account_name: impl Into<String>,
        kind: EntryKind,
        amount: Amount,
        date: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            account_name: account_name.into(),
            kind,
            amount,
            date,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}
