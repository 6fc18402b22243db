//! Best-score persistence
//!
//! The game keeps a single best score for the lifetime of the install.
//! Stores are fire-and-forget: a failed write is logged by the caller and the
//! in-memory value keeps counting.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

/// Why a store could not read or write the best score
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed high score record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Backend that remembers the best score across runs
pub trait HighScoreStore {
    /// Stored best score, 0 when nothing was saved yet
    fn load_high_score(&self) -> Result<u64, StoreError>;

    /// Overwrite the stored best score. Saving the same value twice is harmless.
    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Volatile store, also handy as a shared handle in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(value)),
        }
    }

    /// Current value, visible through every clone of this store
    pub fn get(&self) -> u64 {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u64, StoreError> {
        Ok(self.value.get())
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.value.set(score);
        Ok(())
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "neon_snake_high";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?
        {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(0),
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&score)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::debug!("High score saved ({})", score);
        Ok(())
    }
}

/// JSON file store for the native build
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> Result<u64, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(json.trim())?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        std::fs::write(&self.path, serde_json::to_string(&score)?)?;
        Ok(())
    }
}
