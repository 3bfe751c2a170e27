//! Application layer: shop state, snapshot persistence, and the single-writer
//! service that drives the ledger engine.

pub mod activity;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod store;

pub use activity::{ActivityEntry, ActivityError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use service::{CustomerRef, ShopService};
pub use state::{SCHEMA_VERSION, ShopState};
pub use store::{InMemorySnapshotStore, JsonFileSnapshotStore, SnapshotStore, StoreError};
