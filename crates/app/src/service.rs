//! Single-writer shop service.
//!
//! All writes go through [`ShopService::mutate`]: take the write lock, work
//! on a copy of the state, persist the copy, then swap it in. A rejected
//! request or a failed save leaves both memory and storage untouched.

use core::str::FromStr;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use shopbook_accounts::{Account, NewAccount};
use shopbook_core::{AccountId, StockItemId};
use shopbook_inventory::{StockItem, UpdateStatus, parse_value};
use shopbook_ledger::{Applied, LedgerEntry, OverpayPolicy, Posting, TransactionRequest, apply};
use shopbook_reporting::{DateRange, NetPosition, Totals, entries_on, statement};

use crate::activity::ActivityEntry;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::state::ShopState;
use crate::store::{JsonFileSnapshotStore, SnapshotStore};

/// How a caller names a customer: by id, or by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    Id(AccountId),
    Name(String),
}

impl FromStr for CustomerRef {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CustomerRef::from(s))
    }
}

impl From<&str> for CustomerRef {
    /// Anything that parses as an id is an id; everything else is a name.
    fn from(s: &str) -> Self {
        match s.parse::<AccountId>() {
            Ok(id) => CustomerRef::Id(id),
            Err(_) => CustomerRef::Name(s.trim().to_string()),
        }
    }
}

impl From<AccountId> for CustomerRef {
    fn from(value: AccountId) -> Self {
        CustomerRef::Id(value)
    }
}

pub struct ShopService {
    state: RwLock<ShopState>,
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    policy: OverpayPolicy,
}

impl core::fmt::Debug for ShopService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShopService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ShopService {
    /// Open the JSON snapshot named by `config` with the system clock.
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        Self::with_parts(
            JsonFileSnapshotStore::new(config.data_path.clone()),
            Arc::new(SystemClock),
            config.overpay_policy,
        )
    }

    pub fn with_parts(
        store: impl SnapshotStore + 'static,
        clock: Arc<dyn Clock>,
        policy: OverpayPolicy,
    ) -> AppResult<Self> {
        let state = store.load()?;
        tracing::info!(
            accounts = state.accounts.len(),
            entries = state.ledger.len(),
            stock_items = state.stock.items().len(),
            ?policy,
            "shop state loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
            store: Box::new(store),
            clock,
            policy,
        })
    }

    pub fn policy(&self) -> OverpayPolicy {
        self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppResult<ShopState> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, ShopState>> {
        self.state.read().map_err(|_| AppError::LockPoisoned)
    }

    /// Run one logical transaction: read, change, persist, commit.
    fn mutate<T>(&self, f: impl FnOnce(&mut ShopState, NaiveDate) -> AppResult<T>) -> AppResult<T> {
        let mut guard = self.state.write().map_err(|_| AppError::LockPoisoned)?;
        let mut working = guard.clone();
        let out = f(&mut working, self.clock.today())?;
        self.store.save(&working)?;
        *guard = working;
        Ok(out)
    }

    fn resolve(state: &ShopState, customer: &CustomerRef) -> AppResult<AccountId> {
        match customer {
            CustomerRef::Id(id) => Ok(*id),
            CustomerRef::Name(name) => state
                .accounts
                .find_by_name(name)
                .map(Account::id_typed)
                .ok_or_else(|| AppError::CustomerNotFound(name.clone())),
        }
    }

    // Customers

    pub fn add_customer(&self, new: NewAccount) -> AppResult<Account> {
        let account = self.mutate(|state, _| Ok(state.accounts.create(new)?))?;
        tracing::info!(account_id = %account.id_typed(), "customer added");
        Ok(account)
    }

    /// Remove a customer. Their ledger history stays.
    pub fn remove_customer(&self, customer: &CustomerRef) -> AppResult<Account> {
        let account = self.mutate(|state, _| {
            let id = Self::resolve(state, customer)?;
            Ok(state.accounts.delete(id)?)
        })?;
        tracing::info!(account_id = %account.id_typed(), "customer removed");
        Ok(account)
    }

    pub fn customers(&self) -> AppResult<Vec<Account>> {
        Ok(self.read()?.accounts.list().to_vec())
    }

    pub fn customer(&self, customer: &CustomerRef) -> AppResult<Account> {
        let state = self.read()?;
        let id = Self::resolve(&state, customer)?;
        Ok(state.accounts.get(id)?.clone())
    }

    // Transactions

    /// Record a transaction from raw staff input, stamped with today's date.
    ///
    /// Resolve, validate, net, persist and commit all happen under the write
    /// lock, so concurrent callers see each other's balances.
    pub fn record_transaction(
        &self,
        customer: &CustomerRef,
        kind: &str,
        amount: &str,
    ) -> AppResult<Posting> {
        let policy = self.policy;
        let (request, posting) = self.mutate(|state, today| {
            let id = Self::resolve(state, customer)?;
            let request = TransactionRequest::parse(id, kind, amount, today)?;
            let Applied { ledger, posting, .. } =
                apply(state.accounts.list(), &state.ledger, &request, policy)?;
            state.accounts.replace(posting.account.clone())?;
            state.ledger = ledger;
            Ok((request, posting))
        })?;

        tracing::info!(
            account_id = %request.account_id,
            kind = request.kind.as_str(),
            amount = %request.amount,
            entries = posting.entries.len(),
            due = %posting.account.due(),
            debt = %posting.account.debt(),
            "transaction recorded"
        );
        Ok(posting)
    }

    pub fn ledger(&self) -> AppResult<Vec<LedgerEntry>> {
        Ok(self.read()?.ledger.clone())
    }

    // Stock

    pub fn add_stock(&self, name: &str, value: &str, unit: Option<String>) -> AppResult<StockItem> {
        let value = parse_value(value)?;
        self.mutate(|state, today| Ok(state.stock.add(name, value, unit, today)?))
    }

    pub fn update_stock(&self, name: &str, value: &str) -> AppResult<StockItem> {
        let value = parse_value(value)?;
        self.mutate(|state, today| Ok(state.stock.update_value(name, value, today)?.clone()))
    }

    pub fn edit_stock(&self, id: StockItemId, name: &str, value: &str) -> AppResult<StockItem> {
        let value = parse_value(value)?;
        self.mutate(|state, _| Ok(state.stock.edit(id, name, value)?.clone()))
    }

    pub fn remove_stock(&self, id: StockItemId) -> AppResult<StockItem> {
        self.mutate(|state, _| Ok(state.stock.remove(id)?))
    }

    /// Stock in daily-update order (items not yet updated today first).
    pub fn stock_queue(&self) -> AppResult<Vec<StockItem>> {
        let today = self.today();
        Ok(self
            .read()?
            .stock
            .update_queue(today)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stock_status(&self) -> AppResult<UpdateStatus> {
        Ok(self.read()?.stock.update_status(self.today()))
    }

    // Activity log

    pub fn add_activity(&self, label: &str, amount: &str) -> AppResult<ActivityEntry> {
        self.mutate(|state, today| {
            let entry = ActivityEntry::parse(label, amount, today)?;
            state.activity.push(entry.clone());
            Ok(entry)
        })
    }

    pub fn activity(&self) -> AppResult<Vec<ActivityEntry>> {
        Ok(self.read()?.activity.clone())
    }

    // Reports

    pub fn totals(&self) -> AppResult<Totals> {
        let state = self.read()?;
        let stock = state.stock.total_value()?;
        Ok(Totals::compute(state.accounts.list(), stock)?)
    }

    pub fn net_positions(&self) -> AppResult<Vec<(Account, NetPosition)>> {
        Ok(self
            .read()?
            .accounts
            .list()
            .iter()
            .map(|a| (a.clone(), NetPosition::of(a)))
            .collect())
    }

    /// A customer's entries in `range`; `None` means first entry through today.
    pub fn statement(
        &self,
        customer: &CustomerRef,
        range: Option<DateRange>,
    ) -> AppResult<(DateRange, Vec<LedgerEntry>)> {
        let state = self.read()?;
        let id = Self::resolve(&state, customer)?;
        let range = range.unwrap_or_else(|| DateRange::default_for(&state.ledger, id, self.today()));
        let entries = statement(&state.ledger, id, range).into_iter().cloned().collect();
        Ok((range, entries))
    }

    pub fn entries_today(&self) -> AppResult<Vec<LedgerEntry>> {
        let today = self.today();
        Ok(entries_on(&self.read()?.ledger, today).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityError;
    use crate::clock::FixedClock;
    use crate::store::InMemorySnapshotStore;
    use shopbook_ledger::LedgerError;

    fn service() -> ShopService {
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
        ShopService::with_parts(InMemorySnapshotStore::new(), clock, OverpayPolicy::Faithful).unwrap()
    }

    #[test]
    fn customer_ref_parses_ids_and_names() {
        let id = AccountId::new();
        assert_eq!(id.to_string().parse::<CustomerRef>().unwrap(), CustomerRef::Id(id));
        assert_eq!(
            " Rahim ".parse::<CustomerRef>().unwrap(),
            CustomerRef::Name("Rahim".into())
        );
    }

    #[test]
    fn rejected_transaction_leaves_state_untouched() {
        let svc = service();
        svc.add_customer(NewAccount::new("Rahim", "01711")).unwrap();
        let before = svc.snapshot().unwrap();

        let who = CustomerRef::Name("rahim".into());
        assert!(matches!(
            svc.record_transaction(&who, "Due", "-5"),
            Err(AppError::Ledger(LedgerError::InvalidAmount(_)))
        ));
        assert!(matches!(
            svc.record_transaction(&who, "Refund", "5"),
            Err(AppError::Ledger(LedgerError::UnknownKind(_)))
        ));
        assert!(matches!(
            svc.record_transaction(&CustomerRef::Id(AccountId::new()), "Due", "5"),
            Err(AppError::Ledger(LedgerError::UnknownAccount(_)))
        ));
        assert!(matches!(
            svc.record_transaction(&CustomerRef::Name("Nobody".into()), "Due", "5"),
            Err(AppError::CustomerNotFound(_))
        ));

        assert_eq!(svc.snapshot().unwrap(), before);
    }

    #[test]
    fn transactions_are_stamped_with_clock_day() {
        let svc = service();
        let account = svc.add_customer(NewAccount::new("Rahim", "01711")).unwrap();
        let posting = svc
            .record_transaction(&account.id_typed().into(), "Due", "30")
            .unwrap();
        assert_eq!(posting.entries[0].date(), svc.today());
        assert_eq!(svc.entries_today().unwrap().len(), 1);
    }

    #[test]
    fn overflowing_charge_is_rejected_and_service_stays_usable() {
        let svc = service();
        svc.add_customer(NewAccount::new("Rahim", "01711")).unwrap();
        let who = CustomerRef::Name("Rahim".into());
        let max = rust_decimal::Decimal::MAX.to_string();

        svc.record_transaction(&who, "Due", &max).unwrap();
        let before = svc.snapshot().unwrap();

        assert!(matches!(
            svc.record_transaction(&who, "Due", "1"),
            Err(AppError::Ledger(LedgerError::BalanceOverflow(_)))
        ));
        assert_eq!(svc.snapshot().unwrap(), before);

        let posting = svc.record_transaction(&who, "Payment", "1").unwrap();
        assert_eq!(posting.account.due().value(), rust_decimal::Decimal::MAX - rust_decimal::Decimal::ONE);
        assert_eq!(svc.customers().unwrap().len(), 1);
    }

    #[test]
    fn oversized_totals_surface_as_errors() {
        let svc = service();
        svc.add_customer(NewAccount::new("Rahim", "01711")).unwrap();
        let max = rust_decimal::Decimal::MAX.to_string();
        svc.record_transaction(&CustomerRef::Name("Rahim".into()), "Due", &max)
            .unwrap();
        svc.add_stock("Rice", "1", None).unwrap();

        assert!(matches!(svc.totals(), Err(AppError::Reporting(_))));
        assert!(svc.net_positions().is_ok());
    }

    #[test]
    fn activity_log_is_kept_apart_from_balances() {
        let svc = service();
        let entry = svc.add_activity("Rent", "1500").unwrap();
        assert_eq!(entry.date(), svc.today());
        assert!(matches!(
            svc.add_activity("", "5"),
            Err(AppError::Activity(ActivityError::EmptyLabel))
        ));

        assert_eq!(svc.activity().unwrap(), vec![entry]);
        assert!(svc.ledger().unwrap().is_empty());
        assert_eq!(svc.totals().unwrap().cash, rust_decimal::Decimal::ZERO);
    }
}
