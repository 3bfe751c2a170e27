//! Free-form activity log: shop notes such as "rent 500" that are not tied to
//! a customer and never touch balances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopbook_core::Amount;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityError {
    #[error("activity type is required")]
    EmptyLabel,

    #[error("invalid activity amount: {0}")]
    InvalidAmount(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    label: String,
    amount: Amount,
    date: NaiveDate,
}

impl ActivityEntry {
    /// Build an entry from staff input; the label is trimmed.
    pub fn parse(label: &str, amount: &str, date: NaiveDate) -> Result<Self, ActivityError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ActivityError::EmptyLabel);
        }
        let amount = Amount::parse(amount).map_err(|e| ActivityError::InvalidAmount(e.to_string()))?;
        Ok(Self {
            label: label.to_string(),
            amount,
            date,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}
