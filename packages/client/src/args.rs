use std::path::PathBuf;

use brandkit_types::{ColorRole, HexColor};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use utils::{config::CliEnvExt, serde::deserialize_vec_string};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(flatten)]
    pub args: CliArgs,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Print the current theme settings
    Show,
    /// Change one or more brand colors
    Set(SetColors),
    /// Put every brand color back to its default
    Reset,
    /// Print the shade ramp derived from a single color, without contacting the server
    Ramp {
        color: HexColor,
    },
    /// Switch between the light and dark theme mode
    ToggleMode,
    /// Render the theme as CSS custom properties
    Css {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, Default, Args)]
pub struct SetColors {
    #[arg(long)]
    pub primary: Option<HexColor>,
    #[arg(long)]
    pub secondary: Option<HexColor>,
    #[arg(long)]
    pub tertiary: Option<HexColor>,
    #[arg(long)]
    pub success: Option<HexColor>,
    #[arg(long)]
    pub error: Option<HexColor>,
    #[arg(long)]
    pub warning: Option<HexColor>,
}

impl SetColors {
    pub fn colors(&self) -> impl Iterator<Item = (ColorRole, &HexColor)> {
        [
            (ColorRole::Primary, &self.primary),
            (ColorRole::Secondary, &self.secondary),
            (ColorRole::Tertiary, &self.tertiary),
            (ColorRole::Success, &self.success),
            (ColorRole::Error, &self.error),
            (ColorRole::Warning, &self.warning),
        ]
        .into_iter()
        .filter_map(|(role, color)| color.as_ref().map(|color| (role, color)))
    }
}

/// This struct is used for both args and environment variables
/// the basic idea is that every env var can be overriden by a cli arg
/// and these override the config file
/// env vars follow the pattern of BRANDKIT_CLIENT_{UPPERCASE_ARG_NAME}
#[derive(Debug, Args, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliArgs {
    /// The home directory of the application, where the brandkit.toml configuration file is stored
    /// if not provided, a series of default directories will be tried
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,

    /// The path to an optional dotenv file to try and load
    /// if not set, will be the current working directory's .env
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<PathBuf>,

    /// The brandkit server to sync with
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// The directory holding the local theme cache
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,

    /// Log level
    /// See example config file for more info
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub log_level: Vec<String>,

    /// How long to wait for the server before falling back to the cache
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// Sent as a bearer token when saving
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl CliEnvExt for CliArgs {
    const ENV_VAR_PREFIX: &'static str = "BRANDKIT_CLIENT";
    const TOML_IDENTIFIER: &'static str = "client";

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn dotenv_path(&self) -> Option<PathBuf> {
        self.dotenv.clone()
    }
}
