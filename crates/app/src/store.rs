//! Snapshot persistence.
//!
//! The shop state is saved whole after every committed change. Storage
//! technology sits behind [`SnapshotStore`]; a JSON file is the default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

use crate::state::{SCHEMA_VERSION, ShopState};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("snapshot store lock poisoned")]
    LockPoisoned,
}

/// Load/save of the whole shop state.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved state; an empty store yields the default state.
    fn load(&self) -> Result<ShopState, StoreError>;

    /// Replace the saved state.
    fn save(&self, state: &ShopState) -> Result<(), StoreError>;
}

fn check_schema(state: ShopState) -> Result<ShopState, StoreError> {
    if state.schema_version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: state.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(state)
}

/// In-memory snapshot store.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    saved: RwLock<Option<ShopState>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, as if it had been saved before.
    pub fn with_state(state: ShopState) -> Self {
        Self {
            saved: RwLock::new(Some(state)),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<ShopState, StoreError> {
        let saved = self.saved.read().map_err(|_| StoreError::LockPoisoned)?;
        match saved.as_ref() {
            Some(state) => check_schema(state.clone()),
            None => Ok(ShopState::default()),
        }
    }

    fn save(&self, state: &ShopState) -> Result<(), StoreError> {
        let mut saved = self.saved.write().map_err(|_| StoreError::LockPoisoned)?;
        *saved = Some(state.clone());
        Ok(())
    }
}

/// JSON file snapshot store.
///
/// Saves go to a sibling temp file first and are renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, path: &Path) -> impl FnOnce(io::Error) -> StoreError {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<ShopState, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no snapshot yet; starting empty");
                return Ok(ShopState::default());
            }
            Err(e) => return Err(self.io_err(&self.path)(e)),
        };
        let state: ShopState = serde_json::from_str(&raw)?;
        check_schema(state)
    }

    fn save(&self, state: &ShopState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(self.io_err(parent))?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(self.io_err(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(self.io_err(&self.path))?;
        tracing::debug!(path = %self.path.display(), entries = state.ledger.len(), "snapshot saved");
        Ok(())
    }
}
