use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopbook_core::entity::{find_by_id, position_by_id};
use shopbook_core::{Entity, StockItemId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("stock name is required")]
    EmptyName,

    #[error("a stock item named {0:?} already exists")]
    DuplicateName(String),

    #[error("invalid stock value: {0}")]
    InvalidValue(String),

    #[error("stock item {0:?} not found")]
    NotFound(String),

    #[error("stock item {0:?} has already been updated today")]
    AlreadyUpdatedToday(String),

    #[error("total stock value is too large to represent")]
    ValueOverflow,
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Parse a stock value entered by staff. Must be a finite, non-negative number.
pub fn parse_value(input: &str) -> InventoryResult<Decimal> {
    let trimmed = input.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| InventoryError::InvalidValue(format!("not a number: {trimmed:?}")))?;
    check_value(value)
}

fn check_value(value: Decimal) -> InventoryResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(InventoryError::InvalidValue(format!(
            "value cannot be negative, got {value}"
        )));
    }
    Ok(value)
}

/// One line of the stock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    id: StockItemId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    value: Decimal,
    entry_date: NaiveDate,
    #[serde(default)]
    last_update_date: Option<NaiveDate>,
}

impl StockItem {
    pub fn id_typed(&self) -> StockItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn last_update_date(&self) -> Option<NaiveDate> {
        self.last_update_date
    }

    pub fn updated_on(&self, day: NaiveDate) -> bool {
        self.last_update_date == Some(day)
    }

    fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl Entity for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Daily update progress across the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStatus {
    pub total: usize,
    pub updated_today: usize,
    /// True only for a non-empty list where every item was updated today.
    pub all_updated_today: bool,
}

/// Ordered stock list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockList {
    items: Vec<StockItem>,
}

impl StockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn get(&self, id: StockItemId) -> InventoryResult<&StockItem> {
        find_by_id(&self.items, &id).ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    /// Add an item. A new item counts as updated on the day it is entered.
    pub fn add(
        &mut self,
        name: &str,
        value: Decimal,
        unit: Option<String>,
        today: NaiveDate,
    ) -> InventoryResult<StockItem> {
        let name = self.check_name(name, None)?;
        let value = check_value(value)?;
        let item = StockItem {
            id: StockItemId::new(),
            name,
            unit: unit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
            value,
            entry_date: today,
            last_update_date: Some(today),
        };
        self.items.push(item.clone());
        tracing::debug!(item_id = %item.id, %value, "stock item added");
        Ok(item)
    }

    /// Quick update of an item's value, at most once per calendar day.
    pub fn update_value(
        &mut self,
        name: &str,
        value: Decimal,
        today: NaiveDate,
    ) -> InventoryResult<&StockItem> {
        let value = check_value(value)?;
        let idx = self
            .items
            .iter()
            .position(|i| i.name == name.trim())
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;

        let item = &mut self.items[idx];
        if item.updated_on(today) {
            return Err(InventoryError::AlreadyUpdatedToday(item.name.clone()));
        }
        item.value = value;
        item.last_update_date = Some(today);
        tracing::debug!(item_id = %item.id, %value, "stock value updated");
        Ok(&self.items[idx])
    }

    /// Correct an item's name and value. Does not count as a daily update.
    pub fn edit(&mut self, id: StockItemId, name: &str, value: Decimal) -> InventoryResult<&StockItem> {
        let idx = position_by_id(&self.items, &id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        let name = self.check_name(name, Some(id))?;
        let value = check_value(value)?;

        let item = &mut self.items[idx];
        item.name = name;
        item.value = value;
        Ok(&self.items[idx])
    }

    pub fn remove(&mut self, id: StockItemId) -> InventoryResult<StockItem> {
        let idx = position_by_id(&self.items, &id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        Ok(self.items.remove(idx))
    }

    pub fn total_value(&self) -> InventoryResult<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.value))
            .ok_or(InventoryError::ValueOverflow)
    }

    pub fn update_status(&self, today: NaiveDate) -> UpdateStatus {
        let total = self.items.len();
        let updated_today = self.items.iter().filter(|i| i.updated_on(today)).count();
        UpdateStatus {
            total,
            updated_today,
            all_updated_today: total > 0 && updated_today == total,
        }
    }

    /// Items in update order: not-yet-updated first, relative order kept.
    pub fn update_queue(&self, today: NaiveDate) -> Vec<&StockItem> {
        let mut queue: Vec<&StockItem> = self.items.iter().collect();
        queue.sort_by_key(|i| i.updated_on(today));
        queue
    }

    pub fn updated_on(&self, day: NaiveDate) -> Vec<&StockItem> {
        self.items.iter().filter(|i| i.updated_on(day)).collect()
    }

    fn check_name(&self, name: &str, except: Option<StockItemId>) -> InventoryResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InventoryError::EmptyName);
        }
        if self
            .items
            .iter()
            .any(|i| Some(i.id) != except && i.has_name(name))
        {
            return Err(InventoryError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }
}
