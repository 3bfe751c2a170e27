use serde::{Deserialize, Serialize};

use shopbook_accounts::AccountStore;
use shopbook_inventory::StockList;
use shopbook_ledger::LedgerEntry;

use crate::activity::ActivityEntry;

/// Version of the persisted snapshot layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything the shop persists, independent of where it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    pub schema_version: u32,
    #[serde(default)]
    pub accounts: AccountStore,
    /// Append-only.
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
    #[serde(default)]
    pub stock: StockList,
    /// Free-form notes, oldest first.
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

impl Default for ShopState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            accounts: AccountStore::default(),
            ledger: Vec::new(),
            stock: StockList::default(),
            activity: Vec::new(),
        }
    }
}
