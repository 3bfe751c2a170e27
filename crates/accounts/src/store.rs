use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopbook_core::entity::{find_by_id, position_by_id};
use shopbook_core::{AccountId, DomainError};

use crate::account::Account;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountStoreError {
    #[error("name is required")]
    EmptyName,

    #[error("contact is required")]
    EmptyContact,

    #[error("a customer with contact {0:?} already exists")]
    DuplicateContact(String),

    #[error("a customer named {0:?} already exists")]
    DuplicateName(String),

    #[error("account {0} not found")]
    NotFound(AccountId),
}

impl From<AccountStoreError> for DomainError {
    fn from(value: AccountStoreError) -> Self {
        match value {
            AccountStoreError::EmptyName | AccountStoreError::EmptyContact => {
                DomainError::validation(value.to_string())
            }
            AccountStoreError::DuplicateContact(_) | AccountStoreError::DuplicateName(_) => {
                DomainError::conflict(value.to_string())
            }
            AccountStoreError::NotFound(id) => DomainError::not_found(format!("account {id}")),
        }
    }
}

pub type AccountStoreResult<T> = Result<T, AccountStoreError>;

/// Input for [`AccountStore::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub contact: String,
    pub address: Option<String>,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Ordered collection of accounts with creation-time uniqueness checks.
///
/// Contacts must match exactly to collide; names collide case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with a fresh id and zero balances.
    pub fn create(&mut self, new: NewAccount) -> AccountStoreResult<Account> {
        let name = new.name.trim();
        let contact = new.contact.trim();
        if name.is_empty() {
            return Err(AccountStoreError::EmptyName);
        }
        if contact.is_empty() {
            return Err(AccountStoreError::EmptyContact);
        }
        if self.accounts.iter().any(|a| a.contact() == contact) {
            return Err(AccountStoreError::DuplicateContact(contact.to_string()));
        }
        if self.accounts.iter().any(|a| a.has_name(name)) {
            return Err(AccountStoreError::DuplicateName(name.to_string()));
        }

        let address = new
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let id = AccountId::new();
        let account = Account::open(id, name, contact, address);
        self.accounts.push(account.clone());
        tracing::debug!(account_id = %id, "account created");
        Ok(account)
    }

    pub fn list(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, id: AccountId) -> AccountStoreResult<&Account> {
        find_by_id(&self.accounts, &id).ok_or(AccountStoreError::NotFound(id))
    }

    /// Look an account up by display name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.has_name(name))
    }

    /// Write back an account returned by the ledger engine, in place.
    pub fn replace(&mut self, account: Account) -> AccountStoreResult<()> {
        let id = account.id_typed();
        let idx = position_by_id(&self.accounts, &id).ok_or(AccountStoreError::NotFound(id))?;
        self.accounts[idx] = account;
        Ok(())
    }

    /// Delete an account. Ledger entries referencing it are left untouched.
    pub fn delete(&mut self, id: AccountId) -> AccountStoreResult<Account> {
        let idx = position_by_id(&self.accounts, &id).ok_or(AccountStoreError::NotFound(id))?;
        tracing::debug!(account_id = %id, "account deleted");
        Ok(self.accounts.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
