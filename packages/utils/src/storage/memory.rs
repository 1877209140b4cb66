use std::sync::{Arc, RwLock};

use brandkit_types::ThemeSettings;
use tracing::instrument;

use super::{SettingsBackend, StorageError};

#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<Option<ThemeSettings>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsBackend for MemoryBackend {
    #[instrument(skip(self), fields(subsys = "SettingsBackend"))]
    fn load(&self) -> Result<Option<ThemeSettings>, StorageError> {
        Ok(self.data.read()?.clone())
    }

    #[instrument(skip(self, settings), fields(subsys = "SettingsBackend", version = settings.version))]
    fn save(&self, settings: &ThemeSettings) -> Result<(), StorageError> {
        *self.data.write()? = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::backend;

    #[test]
    fn test_empty_load() {
        backend::test_empty_load(MemoryBackend::new());
    }

    #[test]
    fn test_save_and_load() {
        backend::test_save_and_load(MemoryBackend::new());
    }

    #[test]
    fn test_overwrite() {
        backend::test_overwrite(MemoryBackend::new());
    }

    #[test]
    fn clones_share_data() {
        let store = MemoryBackend::new();
        let other = store.clone();
        store.save(&ThemeSettings::default()).unwrap();
        assert!(other.load().unwrap().is_some());
    }
}
