use std::{
    collections::BTreeMap,
    io::Write,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use brandkit_types::{ThemeMode, ThemeSettings};
use dashmap::DashMap;
use tracing::instrument;

use crate::error::CacheError;

/// Cache key holding `"light"` or `"dark"`
pub const THEME_KEY: &str = "theme";
/// Cache key holding the serialized settings
pub const COLORS_KEY: &str = "themeColors";

pub const CACHE_FILENAME: &str = "cache.json";

/// A small string key/value store that survives restarts
pub trait LocalCache: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Unreadable or corrupt entries are treated as missing
    fn load_settings(&self) -> Option<ThemeSettings> {
        let raw = match self.get(COLORS_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!("Failed to read cached theme colors: {}", err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!("Ignoring corrupt cached theme colors: {}", err);
                None
            }
        }
    }

    fn store_settings(&self, settings: &ThemeSettings) -> Result<(), CacheError> {
        self.set(COLORS_KEY, &serde_json::to_string(settings)?)
    }

    fn load_mode(&self) -> Option<ThemeMode> {
        let raw = self.get(THEME_KEY).ok()??;
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                tracing::warn!("Ignoring cached theme mode: {}", err);
                None
            }
        }
    }

    fn store_mode(&self, mode: ThemeMode) -> Result<(), CacheError> {
        self.set(THEME_KEY, mode.as_str())
    }
}

/// Keeps every entry in a single JSON object on disk
pub struct FileCache {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileCache {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let data_dir: PathBuf = data_dir.into();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)?;
        }

        Ok(Self {
            path: data_dir.join(CACHE_FILENAME),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CacheError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let dir = self.path.parent().map(PathBuf::from).unwrap_or_default();
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&serde_json::to_vec_pretty(entries)?)?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl LocalCache for FileCache {
    #[instrument(skip(self), fields(subsys = "LocalCache"))]
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    #[instrument(skip(self, value), fields(subsys = "LocalCache"))]
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        // a corrupt file is replaced rather than blocking every future write
        let mut entries = self.read_all().unwrap_or_else(|err| {
            tracing::warn!("Discarding unreadable cache {}: {}", self.path.display(), err);
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
