//! Calendar-day clock abstraction.

use std::sync::RwLock;

use chrono::{Days, Local, NaiveDate};

/// Source of "today" for entries and the stock daily-update guard.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day of the machine running the shop.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    day: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: RwLock::new(day),
        }
    }

    pub fn set(&self, day: NaiveDate) {
        if let Ok(mut guard) = self.day.write() {
            *guard = day;
        }
    }

    /// Move forward by `days` calendar days.
    pub fn advance(&self, days: u64) {
        if let Ok(mut guard) = self.day.write() {
            if let Some(next) = guard.checked_add_days(Days::new(days)) {
                *guard = next;
            }
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.day.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
