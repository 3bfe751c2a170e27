use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopbook_core::AccountId;
use shopbook_ledger::LedgerEntry;

/// Inclusive day range; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }

    /// Default range for an account's history: its first entry through `today`.
    pub fn default_for(ledger: &[LedgerEntry], account_id: AccountId, today: NaiveDate) -> Self {
        let from = ledger
            .iter()
            .filter(|e| e.account_id() == account_id)
            .map(LedgerEntry::date)
            .min();
        Self::new(from, Some(today))
    }
}

/// Entries of one account within `range`, in ledger order.
pub fn statement(ledger: &[LedgerEntry], account_id: AccountId, range: DateRange) -> Vec<&LedgerEntry> {
    ledger
        .iter()
        .filter(|e| e.account_id() == account_id && range.contains(e.date()))
        .collect()
}

/// Every entry written on `day`, across accounts.
pub fn entries_on(ledger: &[LedgerEntry], day: NaiveDate) -> Vec<&LedgerEntry> {
    ledger.iter().filter(|e| e.date() == day).collect()
}
