//! Customer accounts (account records and the account store).
//!
//! Accounts are created here with zero balances; balances are only ever
//! changed by the ledger engine and written back through
//! [`AccountStore::replace`].

pub mod account;
pub mod store;

pub use account::Account;
pub use store::{AccountStore, AccountStoreError, AccountStoreResult, NewAccount};
