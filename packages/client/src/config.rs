use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utils::config::ConfigExt;

/// The fully parsed client config
/// built up from the ConfigBuilder (cli args, then env vars, then the `[client]` section)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// The brandkit server to sync with
    /// Default is `http://localhost:8100`
    pub endpoint: String,
    /// The directory holding the local theme cache
    /// Default is `~/.brandkit/client`
    pub data: PathBuf,
    /// The log-level to use, in the format of [tracing directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives).
    /// Default is `["info"]`
    pub log_level: Vec<String>,
    /// Default is `3000`
    pub request_timeout_ms: u64,
    /// Sent as a bearer token when saving, if the server requires one
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8100".to_string(),
            data: PathBuf::from("~/.brandkit/client"),
            log_level: vec!["info".to_string()],
            request_timeout_ms: 3000,
            bearer_token: None,
        }
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
