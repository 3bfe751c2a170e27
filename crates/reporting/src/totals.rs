use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopbook_accounts::Account;

use crate::error::{ReportingError, ReportingResult};

/// Shop-wide figures.
///
/// `cash = total_due + total_stock - total_debt`: what the shop is worth if
/// every customer paid up and every debt were settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_due: Decimal,
    pub total_debt: Decimal,
    pub total_stock: Decimal,
    pub cash: Decimal,
}

impl Totals {
    pub fn compute(accounts: &[Account], inventory_total: Decimal) -> ReportingResult<Self> {
        let total_due = checked_sum(accounts.iter().map(|a| a.due().value()), "total due")?;
        let total_debt = checked_sum(accounts.iter().map(|a| a.debt().value()), "total debt")?;
        let cash = total_due
            .checked_add(inventory_total)
            .and_then(|c| c.checked_sub(total_debt))
            .ok_or(ReportingError::Overflow("cash"))?;
        Ok(Self {
            total_due,
            total_debt,
            total_stock: inventory_total,
            cash,
        })
    }
}

fn checked_sum(
    mut values: impl Iterator<Item = Decimal>,
    what: &'static str,
) -> ReportingResult<Decimal> {
    values
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or(ReportingError::Overflow(what))
}

/// Net standing of one account (`due - debt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", content = "amount", rename_all = "snake_case")]
pub enum NetPosition {
    Settled,
    /// Customer owes the shop this much.
    Due(Decimal),
    /// Shop owes the customer this much.
    Debt(Decimal),
}

impl NetPosition {
    pub fn of(account: &Account) -> Self {
        let net = account.due().value() - account.debt().value();
        if net > Decimal::ZERO {
            NetPosition::Due(net)
        } else if net < Decimal::ZERO {
            NetPosition::Debt(-net)
        } else {
            NetPosition::Settled
        }
    }

    /// Signed net: positive when the customer owes.
    pub fn signed(self) -> Decimal {
        match self {
            NetPosition::Settled => Decimal::ZERO,
            NetPosition::Due(x) => x,
            NetPosition::Debt(x) => -x,
        }
    }
}
