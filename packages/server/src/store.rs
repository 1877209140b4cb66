use std::sync::RwLock;

use brandkit_types::{ThemeSettings, ThemeUpdate};
use chrono::Utc;
use thiserror::Error;
use tracing::instrument;
use utils::storage::{SettingsBackend, StorageError};

/// Owns the canonical settings and serializes every change to them
pub struct ThemeStore<B> {
    backend: B,
    current: RwLock<ThemeSettings>,
}

pub type AnyThemeStore = ThemeStore<Box<dyn SettingsBackend>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Theme was changed by someone else (expected version {expected}, current version {current})")]
    Conflict { expected: u64, current: u64 },

    #[error("Storage: {0}")]
    Backend(#[from] StorageError),

    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned(err.to_string())
    }
}

impl<B: SettingsBackend> ThemeStore<B> {
    /// Loads whatever the backend holds, seeding it with the defaults if it is empty
    #[instrument(skip(backend), fields(subsys = "ThemeStore"))]
    pub fn new(backend: B) -> Result<Self, StoreError> {
        let current = match backend.load()? {
            Some(settings) => {
                tracing::debug!("Loaded theme settings version {}", settings.version);
                settings
            }
            None => {
                let settings = ThemeSettings {
                    updated_at: Utc::now(),
                    ..ThemeSettings::default()
                };
                backend.save(&settings)?;
                tracing::info!("Created default theme settings");
                settings
            }
        };

        Ok(Self {
            backend,
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> Result<ThemeSettings, StoreError> {
        Ok(self.current.read()?.clone())
    }

    pub fn version(&self) -> Result<u64, StoreError> {
        Ok(self.current.read()?.version)
    }

    /// Merges the update over the current settings and persists the result.
    ///
    /// The version check, merge and backend write all happen under one write
    /// lock. Nothing changes unless the backend write succeeds.
    #[instrument(skip(self, update), fields(subsys = "ThemeStore", expected_version = ?update.expected_version))]
    pub fn merge(&self, update: &ThemeUpdate) -> Result<ThemeSettings, StoreError> {
        let mut current = self.current.write()?;

        if let Some(expected) = update.expected_version {
            if expected != current.version {
                return Err(StoreError::Conflict {
                    expected,
                    current: current.version,
                });
            }
        }

        let mut next = current.clone();
        next.merge_colors(update);
        next.stamp(Utc::now());

        self.backend.save(&next)?;
        *current = next.clone();

        tracing::info!("Theme settings updated to version {}", next.version);

        Ok(next)
    }
}

#[cfg(test)]
mod test {
    use brandkit_types::{ColorRole, HexColor};
    use utils::storage::MemoryBackend;

    use super::*;

    fn hex(s: &str) -> HexColor {
        HexColor::new(s).unwrap()
    }

    #[test]
    fn seeds_defaults_into_empty_backend() {
        let backend = MemoryBackend::new();
        let store = ThemeStore::new(backend.clone()).unwrap();

        let settings = store.get().unwrap();
        assert_eq!(settings.primary_color.as_str(), "#465fff");
        assert_eq!(settings.version, 0);
        assert_eq!(backend.load().unwrap(), Some(settings));
    }

    #[test]
    fn keeps_existing_settings() {
        let backend = MemoryBackend::new();
        let mut existing = ThemeSettings::default();
        existing.set_color(ColorRole::Tertiary, hex("#010203"));
        existing.version = 9;
        backend.save(&existing).unwrap();

        let store = ThemeStore::new(backend).unwrap();
        assert_eq!(store.get().unwrap(), existing);
    }

    #[test]
    fn merge_stamps_and_persists() {
        let backend = MemoryBackend::new();
        let store = ThemeStore::new(backend.clone()).unwrap();
        let before = store.get().unwrap();

        let after = store
            .merge(&ThemeUpdate::new().with_color(ColorRole::Primary, hex("#abc123")))
            .unwrap();

        assert_eq!(after.primary_color.as_str(), "#abc123");
        assert_eq!(after.secondary_color, before.secondary_color);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.version, before.version + 1);
        assert_eq!(backend.load().unwrap(), Some(after));
    }

    #[test]
    fn stale_version_is_rejected() {
        let store = ThemeStore::new(MemoryBackend::new()).unwrap();
        store
            .merge(&ThemeUpdate::new().with_color(ColorRole::Error, hex("#111111")))
            .unwrap();
        let before = store.get().unwrap();

        let err = store
            .merge(
                &ThemeUpdate::new()
                    .with_color(ColorRole::Error, hex("#222222"))
                    .with_expected_version(0),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Conflict {
                expected: 0,
                current: 1
            }
        ));
        assert_eq!(store.get().unwrap(), before);
    }

    #[test]
    fn matching_version_is_accepted() {
        let store = ThemeStore::new(MemoryBackend::new()).unwrap();
        let settings = store
            .merge(
                &ThemeUpdate::new()
                    .with_color(ColorRole::Warning, hex("#333"))
                    .with_expected_version(0),
            )
            .unwrap();
        assert_eq!(settings.warning_color.as_str(), "#333");
        assert_eq!(store.version().unwrap(), 1);
    }

    struct FailingBackend;

    impl SettingsBackend for FailingBackend {
        fn load(&self) -> Result<Option<ThemeSettings>, StorageError> {
            Ok(Some(ThemeSettings::default()))
        }

        fn save(&self, _settings: &ThemeSettings) -> Result<(), StorageError> {
            Err(StorageError::Other("disk full".to_string()))
        }
    }

    #[test]
    fn failed_write_leaves_settings_unchanged() {
        let store = ThemeStore::new(FailingBackend).unwrap();

        let err = store
            .merge(&ThemeUpdate::new().with_color(ColorRole::Primary, hex("#000000")))
            .unwrap_err();

        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.get().unwrap(), ThemeSettings::default());
    }
}
