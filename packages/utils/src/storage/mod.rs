pub mod fs;
pub mod memory;

use brandkit_types::ThemeSettings;
use thiserror::Error;

pub use fs::FileBackend;
pub use memory::MemoryBackend;

/// Persists the single canonical settings object.
///
/// Backends are plain load/save slots. Version checks and timestamping
/// belong to whoever owns the settings, not to the backend.
pub trait SettingsBackend: Send + Sync + 'static {
    /// `Ok(None)` means nothing has been saved yet
    fn load(&self) -> Result<Option<ThemeSettings>, StorageError>;

    fn save(&self, settings: &ThemeSettings) -> Result<(), StorageError>;
}

// lets the backend be chosen at runtime from config
impl<T: SettingsBackend + ?Sized> SettingsBackend for Box<T> {
    fn load(&self) -> Result<Option<ThemeSettings>, StorageError> {
        (**self).load()
    }

    fn save(&self, settings: &ThemeSettings) -> Result<(), StorageError> {
        (**self).save(settings)
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Lock poisoned: {0}")]
    Poisoned(String),

    #[error("{0}")]
    Other(String),
}

impl<T> From<std::sync::PoisonError<T>> for StorageError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StorageError::Poisoned(err.to_string())
    }
}
