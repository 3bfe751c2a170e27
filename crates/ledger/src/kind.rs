//! Transaction and ledger-entry kinds.
//!
//! Request kinds are what a caller asks for; auxiliary kinds are only ever
//! produced by the engine while netting. An entry kind is one or the other.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The four transaction kinds a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Customer takes goods on credit ("Due").
    ChargeDue,
    /// Customer pays towards what they owe ("Payment").
    RecordPayment,
    /// Shop takes credit from the customer ("Debt").
    ExtendDebt,
    /// Shop pays back what it owes ("Debt Payment").
    SettleDebt,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::ChargeDue,
        RequestKind::RecordPayment,
        RequestKind::ExtendDebt,
        RequestKind::SettleDebt,
    ];

    /// Label shown to shop staff.
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::ChargeDue => "Due",
            RequestKind::RecordPayment => "Payment",
            RequestKind::ExtendDebt => "Debt",
            RequestKind::SettleDebt => "Debt Payment",
        }
    }

    /// Stable machine name (matches the serde tag).
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::ChargeDue => "charge_due",
            RequestKind::RecordPayment => "record_payment",
            RequestKind::ExtendDebt => "extend_debt",
            RequestKind::SettleDebt => "settle_debt",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestKind {
    type Err = LedgerError;

    /// Accepts the staff label ("Debt Payment") or the machine name
    /// ("settle_debt", "settle-debt"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        RequestKind::ALL
            .into_iter()
            .find(|k| k.label().to_lowercase() == needle || k.as_str() == needle)
            .ok_or_else(|| LedgerError::UnknownKind(s.to_string()))
    }
}

/// Audit kinds the engine emits while netting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryKind {
    /// Part of a new due was covered by what the shop owed.
    AutoAdjustedPaidFromDebt,
    /// Part of a new debt was covered by what the customer owed.
    AutoAdjustedPaidFromDue,
    /// Payment beyond the customer's due.
    DebtAutoOverpay,
    /// Debt payment beyond what the shop owed.
    DueAutoOverpay,
}

impl AuxiliaryKind {
    pub fn label(self) -> &'static str {
        match self {
            AuxiliaryKind::AutoAdjustedPaidFromDebt => "Auto Adjusted: Paid from Debt",
            AuxiliaryKind::AutoAdjustedPaidFromDue => "Auto Adjusted: Paid from Due",
            AuxiliaryKind::DebtAutoOverpay => "Debt (Auto Overpay)",
            AuxiliaryKind::DueAutoOverpay => "Due (Auto Overpay)",
        }
    }
}

/// Kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Recorded(RequestKind),
    Auxiliary(AuxiliaryKind),
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Recorded(kind) => kind.label(),
            EntryKind::Auxiliary(kind) => kind.label(),
        }
    }

    pub fn is_auxiliary(self) -> bool {
        matches!(self, EntryKind::Auxiliary(_))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<RequestKind> for EntryKind {
    fn from(value: RequestKind) -> Self {
        EntryKind::Recorded(value)
    }
}

impl From<AuxiliaryKind> for EntryKind {
    fn from(value: AuxiliaryKind) -> Self {
        EntryKind::Auxiliary(value)
    }
}
