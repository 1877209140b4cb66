use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utils::{
    config::ConfigExt,
    storage::{FileBackend, MemoryBackend, SettingsBackend, StorageError},
};
use utoipa::ToSchema;

use crate::auth::Role;

/// The fully parsed and validated config struct we use in the application
/// this is built up from the ConfigBuilder which can load from multiple sources (in order of preference):
///
/// 1. cli args
/// 2. environment variables
/// 3. config file
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Config {
    /// The port to bind the server to.
    /// Default is `8100`
    pub port: u16,
    /// The log-level to use, in the format of [tracing directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives).
    /// Default is `["info"]`
    pub log_level: Vec<String>,
    /// The host to bind the server to
    /// Default is `localhost`
    pub host: String,
    /// The directory to store the theme settings file
    /// Default is `/var/brandkit`
    #[schema(value_type = String)]
    pub data: PathBuf,
    /// The allowed cors origins
    /// Default is empty
    pub cors_allowed_origins: Vec<String>,
    /// Where the theme settings are kept
    /// Default is `file`
    pub storage: StorageKind,
    /// Protects `PUT /theme` when set. Never echoed back by `/config`
    #[serde(skip_serializing, default)]
    pub bearer_token: Option<String>,
    /// The role every caller is treated as having
    /// Default is `super_admin`
    pub granted_role: Role,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    #[default]
    File,
}

/// Default values for the config struct
/// these are only used to fill in holes after all the parsing and loading is done
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8100,
            log_level: vec!["info".to_string()],
            host: "localhost".to_string(),
            data: PathBuf::from("/var/brandkit"),
            cors_allowed_origins: Vec::new(),
            storage: StorageKind::default(),
            bearer_token: None,
            granted_role: Role::default(),
        }
    }
}

impl Config {
    pub fn settings_backend(&self) -> Result<Box<dyn SettingsBackend>, StorageError> {
        Ok(match self.storage {
            StorageKind::Memory => Box::new(MemoryBackend::new()),
            StorageKind::File => Box::new(FileBackend::new(&self.data)?),
        })
    }
}

impl ConfigExt for Config {
    const DIRNAME: &'static str = "brandkit";
    const FILENAME: &'static str = "brandkit.toml";

    fn with_data_dir(&mut self, f: fn(&mut PathBuf)) {
        f(&mut self.data);
    }

    fn log_levels(&self) -> impl Iterator<Item = &str> {
        self.log_level.iter().map(|s| s.as_str())
    }
}
