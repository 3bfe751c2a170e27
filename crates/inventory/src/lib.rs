//! Stock list: what the shop holds and what it is worth.
//!
//! Values feed the shop-wide totals; quantities are not tracked. Each item
//! may be quick-updated at most once per calendar day.

pub mod stock;

pub use stock::{InventoryError, InventoryResult, StockItem, StockList, UpdateStatus, parse_value};
