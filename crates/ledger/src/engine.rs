//! Netting engine.
//!
//! Every request first nets against the *opposing* balance (the offset), then
//! applies what is left (the remainder) to its own side. Each non-zero step
//! is logged as its own entry, offset first. Both balances are floored at
//! zero afterwards.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopbook_accounts::Account;
use shopbook_core::entity::position_by_id;
use shopbook_core::{Amount, Balance};

use crate::entry::LedgerEntry;
use crate::error::{LedgerError, LedgerResult};
use crate::kind::{AuxiliaryKind, EntryKind, RequestKind};
use crate::request::TransactionRequest;

/// How the remainder of a `RecordPayment` / `SettleDebt` is applied.
///
/// `Faithful` subtracts the remainder from the opposing balance and lets the
/// zero floor absorb it, so the logged overpayment is not reflected in any
/// balance. `CarryCredit` adds it to the opposing balance instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverpayPolicy {
    #[default]
    Faithful,
    CarryCredit,
}

impl FromStr for OverpayPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "faithful" => Ok(OverpayPolicy::Faithful),
            "carry-credit" => Ok(OverpayPolicy::CarryCredit),
            _ => Err(LedgerError::UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Due,
    Debt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Add,
    Subtract,
}

/// One row of the netting table.
#[derive(Debug, Clone, Copy)]
struct NettingRule {
    target: Side,
    offset_kind: EntryKind,
    remainder_side: Side,
    remainder_sign: Sign,
    remainder_kind: EntryKind,
}

impl RequestKind {
    fn netting_rule(self, policy: OverpayPolicy) -> NettingRule {
        let overpay_sign = match policy {
            OverpayPolicy::Faithful => Sign::Subtract,
            OverpayPolicy::CarryCredit => Sign::Add,
        };
        match self {
            RequestKind::ChargeDue => NettingRule {
                target: Side::Debt,
                offset_kind: AuxiliaryKind::AutoAdjustedPaidFromDebt.into(),
                remainder_side: Side::Due,
                remainder_sign: Sign::Add,
                remainder_kind: RequestKind::ChargeDue.into(),
            },
            RequestKind::RecordPayment => NettingRule {
                target: Side::Due,
                offset_kind: RequestKind::RecordPayment.into(),
                remainder_side: Side::Debt,
                remainder_sign: overpay_sign,
                remainder_kind: AuxiliaryKind::DebtAutoOverpay.into(),
            },
            RequestKind::ExtendDebt => NettingRule {
                target: Side::Due,
                offset_kind: AuxiliaryKind::AutoAdjustedPaidFromDue.into(),
                remainder_side: Side::Debt,
                remainder_sign: Sign::Add,
                remainder_kind: RequestKind::ExtendDebt.into(),
            },
            RequestKind::SettleDebt => NettingRule {
                target: Side::Debt,
                offset_kind: RequestKind::SettleDebt.into(),
                remainder_side: Side::Due,
                remainder_sign: overpay_sign,
                remainder_kind: AuxiliaryKind::DueAutoOverpay.into(),
            },
        }
    }
}

/// Working (pre-clamp) balances; may dip below zero mid-computation.
#[derive(Debug, Clone, Copy)]
struct Working {
    due: Decimal,
    debt: Decimal,
}

impl Working {
    fn slot(&mut self, side: Side) -> &mut Decimal {
        match side {
            Side::Due => &mut self.due,
            Side::Debt => &mut self.debt,
        }
    }

    fn get(&self, side: Side) -> Decimal {
        match side {
            Side::Due => self.due,
            Side::Debt => self.debt,
        }
    }

    /// Magnitude the zero floor is about to throw away.
    fn below_zero(&self) -> Decimal {
        (-self.due).max(Decimal::ZERO) + (-self.debt).max(Decimal::ZERO)
    }
}

/// Result of posting one request against one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The account with its new balances.
    pub account: Account,
    /// Zero, one or two entries, offset first.
    pub entries: Vec<LedgerEntry>,
    /// Portion netted against the opposing balance.
    pub offset: Decimal,
    /// Portion applied to the request's own side (`amount - offset`).
    pub remainder: Decimal,
    /// Magnitude dropped by the zero floor (always zero under `CarryCredit`).
    pub discarded: Decimal,
}

/// Post a request against a single account.
///
/// Fails with [`LedgerError::UnknownAccount`] if the request names a different
/// account and with [`LedgerError::BalanceOverflow`] if a balance would leave
/// the decimal range; the input account is never modified.
pub fn post(
    account: &Account,
    request: &TransactionRequest,
    policy: OverpayPolicy,
) -> LedgerResult<Posting> {
    if account.id_typed() != request.account_id {
        return Err(LedgerError::UnknownAccount(request.account_id));
    }

    let rule = request.kind.netting_rule(policy);
    let amount = request.amount.value();
    let mut working = Working {
        due: account.due().value(),
        debt: account.debt().value(),
    };
    let mut entries = Vec::with_capacity(2);

    let overflow = || LedgerError::BalanceOverflow(request.account_id);
    let offset = amount.min(working.get(rule.target));
    let remainder = amount - offset;

    if offset > Decimal::ZERO {
        let slot = working.slot(rule.target);
        *slot = slot.checked_sub(offset).ok_or_else(overflow)?;
        entries.push(entry(account, request, rule.offset_kind, offset)?);
    }

    if remainder > Decimal::ZERO {
        let slot = working.slot(rule.remainder_side);
        let next = match rule.remainder_sign {
            Sign::Add => slot.checked_add(remainder),
            Sign::Subtract => slot.checked_sub(remainder),
        };
        *slot = next.ok_or_else(overflow)?;
        entries.push(entry(account, request, rule.remainder_kind, remainder)?);
    }

    let discarded = working.below_zero();
    let updated = account.with_balances(Balance::floor(working.due), Balance::floor(working.debt));

    tracing::debug!(
        account_id = %request.account_id,
        kind = request.kind.as_str(),
        %amount,
        %offset,
        %remainder,
        entries = entries.len(),
        "posted transaction"
    );
    if discarded > Decimal::ZERO {
        tracing::warn!(
            account_id = %request.account_id,
            kind = request.kind.as_str(),
            %discarded,
            "zero floor discarded logged overpayment"
        );
    }

    Ok(Posting {
        account: updated,
        entries,
        offset,
        remainder,
        discarded,
    })
}

fn entry(
    account: &Account,
    request: &TransactionRequest,
    kind: EntryKind,
    amount: Decimal,
) -> LedgerResult<LedgerEntry> {
    Ok(LedgerEntry::new(
        account.id_typed(),
        account.name(),
        kind,
        Amount::new(amount)?,
        request.date,
    ))
}

/// New state produced by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Full account set, with the target account replaced in place.
    pub accounts: Vec<Account>,
    /// Full ledger: the input ledger followed by the appended entries.
    pub ledger: Vec<LedgerEntry>,
    /// Details of the posting on the target account.
    pub posting: Posting,
}

impl Applied {
    /// Entries appended by this call.
    pub fn appended(&self) -> &[LedgerEntry] {
        &self.posting.entries
    }
}

/// Apply a request to an account set and ledger.
///
/// Inputs are borrowed and left untouched; on error nothing new is produced.
pub fn apply(
    accounts: &[Account],
    ledger: &[LedgerEntry],
    request: &TransactionRequest,
    policy: OverpayPolicy,
) -> LedgerResult<Applied> {
    let idx = position_by_id(accounts, &request.account_id)
        .ok_or(LedgerError::UnknownAccount(request.account_id))?;
    let posting = post(&accounts[idx], request, policy)?;

    let mut new_accounts = accounts.to_vec();
    new_accounts[idx] = posting.account.clone();

    let mut new_ledger = Vec::with_capacity(ledger.len() + posting.entries.len());
    new_ledger.extend_from_slice(ledger);
    new_ledger.extend(posting.entries.iter().cloned());

    Ok(Applied {
        accounts: new_accounts,
        ledger: new_ledger,
        posting,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use shopbook_core::AccountId;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn test_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    fn account_with(due: i64, debt: i64) -> Account {
        Account::open(AccountId::new(), "Rahim", "01711", None).with_balances(
            Balance::new(d(due)).unwrap(),
            Balance::new(d(debt)).unwrap(),
        )
    }

    fn request(account: &Account, kind: RequestKind, amount: i64) -> TransactionRequest {
        TransactionRequest::with_decimal(account.id_typed(), kind, d(amount), test_day()).unwrap()
    }

    fn summary(entries: &[LedgerEntry]) -> Vec<(EntryKind, Decimal)> {
        entries.iter().map(|e| (e.kind(), e.amount().value())).collect()
    }

    #[test]
    fn charge_due_without_debt_adds_to_due() {
        let account = account_with(100, 0);
        let p = post(&account, &request(&account, RequestKind::ChargeDue, 30), OverpayPolicy::Faithful)
            .unwrap();

        assert_eq!(p.account.due().value(), d(130));
        assert!(p.account.debt().is_zero());
        assert_eq!(summary(&p.entries), vec![(EntryKind::from(RequestKind::ChargeDue), d(30))]);
    }

    #[test]
    fn charge_due_nets_against_debt_first() {
        let account = account_with(0, 50);
        let p = post(&account, &request(&account, RequestKind::ChargeDue, 80), OverpayPolicy::Faithful)
            .unwrap();

        assert_eq!(
            summary(&p.entries),
            vec![
                (EntryKind::from(AuxiliaryKind::AutoAdjustedPaidFromDebt), d(50)),
                (EntryKind::from(RequestKind::ChargeDue), d(30)),
            ]
        );
        assert_eq!(p.account.due().value(), d(30));
        assert!(p.account.debt().is_zero());
        assert_eq!((p.offset, p.remainder), (d(50), d(30)));
    }

    #[test]
    fn overpayment_is_logged_but_floored_away() {
        let account = account_with(40, 0);
        let p = post(
            &account,
            &request(&account, RequestKind::RecordPayment, 100),
            OverpayPolicy::Faithful,
        )
        .unwrap();

        assert_eq!(
            summary(&p.entries),
            vec![
                (EntryKind::from(RequestKind::RecordPayment), d(40)),
                (EntryKind::from(AuxiliaryKind::DebtAutoOverpay), d(60)),
            ]
        );
        assert!(p.account.due().is_zero());
        assert!(p.account.debt().is_zero());
        assert_eq!(p.discarded, d(60));
    }

    #[test]
    fn debt_overpayment_is_logged_but_floored_away() {
        let account = account_with(0, 20);
        let p = post(
            &account,
            &request(&account, RequestKind::SettleDebt, 50),
            OverpayPolicy::Faithful,
        )
        .unwrap();

        assert_eq!(
            summary(&p.entries),
            vec![
                (EntryKind::from(RequestKind::SettleDebt), d(20)),
                (EntryKind::from(AuxiliaryKind::DueAutoOverpay), d(30)),
            ]
        );
        assert!(p.account.due().is_zero());
        assert!(p.account.debt().is_zero());
        assert_eq!(p.discarded, d(30));
    }

    #[test]
    fn faithful_payment_remainder_eats_existing_debt() {
        // Both balances positive only via hand-built state; the subtract rule
        // still applies to the opposing side.
        let account = account_with(40, 10);
        let p = post(
            &account,
            &request(&account, RequestKind::RecordPayment, 45),
            OverpayPolicy::Faithful,
        )
        .unwrap();
        assert!(p.account.due().is_zero());
        assert_eq!(p.account.debt().value(), d(5));
        assert!(p.discarded.is_zero());
    }

    #[test]
    fn carry_credit_reflects_overpayments() {
        let account = account_with(40, 0);
        let p = post(
            &account,
            &request(&account, RequestKind::RecordPayment, 100),
            OverpayPolicy::CarryCredit,
        )
        .unwrap();
        assert!(p.account.due().is_zero());
        assert_eq!(p.account.debt().value(), d(60));
        assert!(p.discarded.is_zero());

        let account = account_with(0, 20);
        let p = post(
            &account,
            &request(&account, RequestKind::SettleDebt, 50),
            OverpayPolicy::CarryCredit,
        )
        .unwrap();
        assert_eq!(p.account.due().value(), d(30));
        assert!(p.account.debt().is_zero());
        assert_eq!(
            summary(&p.entries),
            vec![
                (EntryKind::from(RequestKind::SettleDebt), d(20)),
                (EntryKind::from(AuxiliaryKind::DueAutoOverpay), d(30)),
            ]
        );
    }

    #[test]
    fn extend_debt_nets_against_due() {
        let account = account_with(25, 0);
        let p = post(&account, &request(&account, RequestKind::ExtendDebt, 25), OverpayPolicy::Faithful)
            .unwrap();
        assert_eq!(
            summary(&p.entries),
            vec![(EntryKind::from(AuxiliaryKind::AutoAdjustedPaidFromDue), d(25))]
        );
        assert!(p.account.due().is_zero());
        assert!(p.account.debt().is_zero());
    }

    #[test]
    fn entries_carry_snapshot_and_date() {
        let account = account_with(0, 0);
        let p = post(&account, &request(&account, RequestKind::ExtendDebt, 10), OverpayPolicy::Faithful)
            .unwrap();
        let e = &p.entries[0];
        assert_eq!(e.account_id(), account.id_typed());
        assert_eq!(e.account_name(), "Rahim");
        assert_eq!(e.date(), test_day());
        assert_eq!(p.account.debt().value(), d(10));
    }

    #[test]
    fn post_rejects_mismatched_account() {
        let account = account_with(0, 0);
        let other = account_with(0, 0);
        let err = post(&account, &request(&other, RequestKind::ChargeDue, 5), OverpayPolicy::Faithful)
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownAccount(other.id_typed()));
    }

    #[test]
    fn apply_replaces_target_and_appends_in_order() {
        let first = account_with(0, 0);
        let target = account_with(0, 50);
        let accounts = vec![first.clone(), target.clone()];
        let ledger = vec![LedgerEntry::new(
            first.id_typed(),
            first.name(),
            RequestKind::ChargeDue.into(),
            Amount::new(d(5)).unwrap(),
            test_day(),
        )];

        let applied = apply(
            &accounts,
            &ledger,
            &request(&target, RequestKind::ChargeDue, 80),
            OverpayPolicy::Faithful,
        )
        .unwrap();

        assert_eq!(applied.accounts[0], first);
        assert_eq!(applied.accounts[1].due().value(), d(30));
        assert_eq!(applied.ledger.len(), 3);
        assert_eq!(applied.ledger[0], ledger[0]);
        assert_eq!(&applied.ledger[1..], applied.appended());
        // Inputs untouched.
        assert_eq!(accounts[1], target);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn apply_unknown_account_changes_nothing() {
        let accounts = vec![account_with(10, 0)];
        let ledger: Vec<LedgerEntry> = Vec::new();
        let stranger = account_with(0, 0);
        let before = accounts.clone();

        let err = apply(
            &accounts,
            &ledger,
            &request(&stranger, RequestKind::RecordPayment, 5),
            OverpayPolicy::Faithful,
        )
        .unwrap_err();

        assert_eq!(err, LedgerError::UnknownAccount(stranger.id_typed()));
        assert_eq!(accounts, before);
        assert!(ledger.is_empty());
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("faithful".parse::<OverpayPolicy>(), Ok(OverpayPolicy::Faithful));
        assert_eq!("carry_credit".parse::<OverpayPolicy>(), Ok(OverpayPolicy::CarryCredit));
        assert_eq!(
            "lenient".parse::<OverpayPolicy>(),
            Err(LedgerError::UnknownPolicy("lenient".into()))
        );
    }

    #[test]
    fn overflowing_charge_is_rejected_without_change() {
        let account = account_with(5, 0);
        let request =
            TransactionRequest::with_decimal(account.id_typed(), RequestKind::ChargeDue, Decimal::MAX, test_day())
                .unwrap();

        assert_eq!(
            post(&account, &request, OverpayPolicy::Faithful),
            Err(LedgerError::BalanceOverflow(account.id_typed()))
        );

        let accounts = vec![account.clone()];
        assert!(apply(&accounts, &[], &request, OverpayPolicy::CarryCredit).is_err());
        assert_eq!(accounts, vec![account]);
    }

    #[test]
    fn charge_up_to_the_maximum_still_posts() {
        let account = account_with(0, 0);
        let request =
            TransactionRequest::with_decimal(account.id_typed(), RequestKind::ChargeDue, Decimal::MAX, test_day())
                .unwrap();
        let p = post(&account, &request, OverpayPolicy::Faithful).unwrap();
        assert_eq!(p.account.due().value(), Decimal::MAX);
    }

    fn kind_strategy() -> impl Strategy<Value = RequestKind> {
        prop::sample::select(RequestKind::ALL.to_vec())
    }

    fn policy_strategy() -> impl Strategy<Value = OverpayPolicy> {
        prop::sample::select(vec![OverpayPolicy::Faithful, OverpayPolicy::CarryCredit])
    }

    fn cents(c: u32) -> Decimal {
        Decimal::new(i64::from(c), 2)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Balances stay non-negative, at most two entries are written, and
        /// offset + remainder always equals the requested amount.
        #[test]
        fn posting_invariants_hold(
            due in 0u32..1_000_000,
            debt in 0u32..1_000_000,
            amount in 1u32..1_000_000,
            kind in kind_strategy(),
            policy in policy_strategy(),
        ) {
            let account = Account::open(AccountId::new(), "P", "1", None)
                .with_balances(Balance::new(cents(due)).unwrap(), Balance::new(cents(debt)).unwrap());
            let req = TransactionRequest::with_decimal(account.id_typed(), kind, cents(amount), test_day()).unwrap();

            let p = post(&account, &req, policy).unwrap();

            prop_assert!(p.account.due().value() >= Decimal::ZERO);
            prop_assert!(p.account.debt().value() >= Decimal::ZERO);
            prop_assert!(p.entries.len() <= 2);
            prop_assert!(!p.entries.is_empty());
            prop_assert_eq!(p.offset + p.remainder, cents(amount));
            let logged: Decimal = p.entries.iter().map(|e| e.amount().value()).sum();
            prop_assert_eq!(logged, cents(amount));
        }

        /// Under CarryCredit the net position (due - debt) moves by exactly
        /// the requested amount.
        #[test]
        fn carry_credit_conserves_net_position(
            due in 0u32..1_000_000,
            debt in 0u32..1_000_000,
            amount in 1u32..1_000_000,
            kind in kind_strategy(),
        ) {
            let account = Account::open(AccountId::new(), "P", "1", None)
                .with_balances(Balance::new(cents(due)).unwrap(), Balance::new(cents(debt)).unwrap());
            let req = TransactionRequest::with_decimal(account.id_typed(), kind, cents(amount), test_day()).unwrap();

            let p = post(&account, &req, OverpayPolicy::CarryCredit).unwrap();
            let before = cents(due) - cents(debt);
            let after = p.account.due().value() - p.account.debt().value();
            let expected = match kind {
                RequestKind::ChargeDue | RequestKind::SettleDebt => before + cents(amount),
                RequestKind::RecordPayment | RequestKind::ExtendDebt => before - cents(amount),
            };
            prop_assert_eq!(after, expected);
            prop_assert!(p.discarded.is_zero());
        }

        /// Starting from a fresh account, at most one balance is ever non-zero.
        #[test]
        fn netting_keeps_balances_exclusive(
            steps in prop::collection::vec((kind_strategy(), 1u32..100_000), 1..20),
            policy in policy_strategy(),
        ) {
            let mut account = Account::open(AccountId::new(), "P", "1", None);
            for (kind, amount) in steps {
                let req = TransactionRequest::with_decimal(account.id_typed(), kind, cents(amount), test_day()).unwrap();
                account = post(&account, &req, policy).unwrap().account;
                prop_assert!(account.due().is_zero() || account.debt().is_zero());
            }
        }
    }
}
