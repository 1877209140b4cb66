use std::io::Write;
use std::path::PathBuf;

use brandkit_types::ThemeSettings;
use tracing::instrument;

use super::{SettingsBackend, StorageError};

pub const SETTINGS_FILENAME: &str = "theme-settings.json";

/// Keeps the settings as a single pretty-printed JSON file in the data dir
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    #[instrument(skip(data_dir), fields(subsys = "SettingsBackend"))]
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir: PathBuf = data_dir.into();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| {
                StorageError::Other(format!(
                    "Error creating data dir {}: {}",
                    data_dir.to_string_lossy(),
                    e
                ))
            })?;
        }
        Ok(FileBackend { data_dir })
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILENAME)
    }
}

impl SettingsBackend for FileBackend {
    #[instrument(skip(self), fields(subsys = "SettingsBackend"))]
    fn load(&self) -> Result<Option<ThemeSettings>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Writes to a temp file in the same dir and renames it over the old one,
    /// so readers never see a half-written file
    #[instrument(skip(self, settings), fields(subsys = "SettingsBackend", version = settings.version))]
    fn save(&self, settings: &ThemeSettings) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(settings)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        file.write_all(&data)?;
        file.as_file().sync_all()?;
        file.persist(self.path()).map_err(|e| e.error)?;

        Ok(())
    }
}
