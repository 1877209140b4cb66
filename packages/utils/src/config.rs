use anyhow::{bail, Result};
use figment::{providers::Format, Figment};
use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, path::PathBuf};

/// Env var that can point at a dotenv file for any brandkit binary
pub const DOTENV_ENV_VAR: &str = "BRANDKIT_DOTENV";

/// Env var that can point at the directory holding the config file
pub const HOME_ENV_VAR: &str = "BRANDKIT_HOME";

/// The builder we use to build Config
#[derive(Debug)]
pub struct ConfigBuilder<CONFIG, ARG> {
    pub cli_env_args: ARG,
    _config: PhantomData<CONFIG>,
}

pub trait CliEnvExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    // e.g. "BRANDKIT"
    const ENV_VAR_PREFIX: &'static str;

    // The section identifier in the TOML file, e.g. "server", "client"
    const TOML_IDENTIFIER: &'static str;

    // an optional argument to specify the home directory
    // if not supplied, config will try a series of fallbacks
    fn home_dir(&self) -> Option<PathBuf>;

    // an optional argument to specify a dotenv file
    // if not supplied, the current directory's .env is tried
    fn dotenv_path(&self) -> Option<PathBuf>;

    fn merge_cli_env_args(&self) -> Result<Self> {
        let env_prefix = format!("{}_", Self::ENV_VAR_PREFIX);

        let merged = Figment::new()
            .merge(figment::providers::Env::prefixed(&env_prefix))
            .merge(figment::providers::Serialized::defaults(self))
            .extract()?;

        Ok(merged)
    }
}

pub trait ConfigExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    // e.g. "brandkit.toml"
    const FILENAME: &'static str = "brandkit.toml";

    // the directory name used when looking in the usual config locations
    const DIRNAME: &'static str = "brandkit";

    // the data directory, which is the root of the data storage
    fn with_data_dir(&mut self, f: fn(&mut PathBuf));

    fn log_levels(&self) -> impl Iterator<Item = &str>;

    fn tracing_env_filter(&self) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in self.log_levels() {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }
}

impl<CONFIG: ConfigExt, ARG: CliEnvExt> ConfigBuilder<CONFIG, ARG> {
    pub fn new(cli_env_args: ARG) -> Self {
        Self {
            cli_env_args,
            _config: PhantomData,
        }
    }

    pub fn build(self) -> Result<CONFIG> {
        // try to load dotenv first, since it may affect env vars for filepaths
        let mut dotenv_paths = Vec::new();

        if let Some(dotenv_path) = self.cli_env_args.dotenv_path() {
            dotenv_paths.push(dotenv_path);
        }

        if let Ok(dotenv_path) = std::env::var(DOTENV_ENV_VAR) {
            dotenv_paths.push(PathBuf::from(dotenv_path));
        }

        dotenv_paths.push(std::env::current_dir()?.join(".env"));

        for dotenv_path in dotenv_paths {
            if dotenv_path.exists() {
                tracing::debug!("Loading env vars from {}", dotenv_path.display());
                if let Err(e) = dotenvy::from_path(&dotenv_path) {
                    bail!("Error loading dotenv file {}: {}", dotenv_path.display(), e);
                }
            }
        }

        // first merge the cli and env vars
        let cli_env_args = self.cli_env_args.merge_cli_env_args()?;

        // start with the default values as the base
        let mut figment = Figment::new().merge(figment::providers::Serialized::defaults(
            CONFIG::default(),
        ));

        // a missing config file is fine, defaults and cli/env args fill the gaps
        match ConfigFilePath::new(CONFIG::FILENAME, CONFIG::DIRNAME, cli_env_args.home_dir())
            .into_path()
        {
            Some(filepath) => {
                tracing::debug!("Loading config from {}", filepath.display());
                figment = figment
                    // then the [default] section of the file
                    .merge(Figment::from(
                        figment::providers::Toml::file(&filepath).nested(),
                    ))
                    // then our own section, overriding globals where needed
                    .merge(
                        Figment::from(figment::providers::Toml::file(&filepath).nested())
                            .select(ARG::TOML_IDENTIFIER),
                    );
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG::FILENAME);
            }
        }

        // finally override with cli/env args
        let figment = figment.merge(figment::providers::Serialized::defaults(cli_env_args));

        let mut config: CONFIG = figment.extract()?;

        config.with_data_dir(|data_dir| {
            *data_dir = shellexpand::tilde(&data_dir.to_string_lossy())
                .to_string()
                .into();
        });

        Ok(config)
    }
}

// a helper to try a series of fallback paths, looking for a config file
#[derive(Clone, Debug)]
pub struct ConfigFilePath {
    // the filename to look for in each directory, e.g. "brandkit.toml"
    pub filename: String,
    // the directory name used under the usual config locations, e.g. "brandkit"
    pub dirname: String,
    // the optional directory set via direct args or env
    pub arg_env_dir: Option<PathBuf>,
}

impl ConfigFilePath {
    pub fn new(filename: impl ToString, dirname: impl ToString, arg_env_dir: Option<PathBuf>) -> Self {
        Self {
            filename: filename.to_string(),
            dirname: dirname.to_string(),
            arg_env_dir,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.into_possible().into_iter().find(|path| path.exists())
    }

    // tries a series of fallbacks, in order of preference
    pub fn into_possible(self) -> Vec<PathBuf> {
        let Self {
            filename,
            dirname,
            arg_env_dir,
        } = self;

        let mut dirs = Vec::new();

        // explicit, e.g. passing --home /foo to a binary, or env var {ENV_PREFIX}_HOME="/foo"
        // i.e. the path in this case will be /foo/{filename}
        if let Some(dir) = arg_env_dir {
            dirs.push(dir);
        }

        // literal env var BRANDKIT_HOME, shared by every binary
        if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
            dirs.push(dir.into());
        }

        // the current working directory, wherever the command is run from
        if let Ok(dir) = std::env::current_dir() {
            dirs.push(dir);
        }

        // ~/.{dirname}/{filename}, keeps the home directory itself clean
        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(format!(".{dirname}"))) {
            dirs.push(dir);
        }

        // the system config directory, which varies per platform:
        // Linux: ~/.config/brandkit/brandkit.toml
        // macOS: ~/Library/Application Support/brandkit/brandkit.toml
        // Windows: C:\Users\MyUserName\AppData\Roaming\brandkit\brandkit.toml
        if let Some(dir) = dirs::config_dir().map(|dir| dir.join(&dirname)) {
            dirs.push(dir);
        }

        // may repeat config_dir on linux, but helps on macOS, windows and wsl
        if let Some(dir) = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .map(|dir| dir.join(&dirname))
        {
            dirs.push(dir);
        }

        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(".config").join(&dirname)) {
            dirs.push(dir);
        }

        // lastly, /etc/brandkit/brandkit.toml
        dirs.push(PathBuf::from("/etc").join(&dirname));

        let mut all_files: Vec<PathBuf> = dirs.into_iter().map(|dir| dir.join(&filename)).collect();

        all_files.dedup();

        all_files
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::ConfigFilePath;

    #[test]
    fn explicit_home_is_tried_first() {
        let paths =
            ConfigFilePath::new("brandkit.toml", "brandkit", Some(PathBuf::from("/tmp1")))
                .into_possible();

        assert_eq!(paths.first().unwrap(), &PathBuf::from("/tmp1/brandkit.toml"));
        assert_eq!(
            paths.last().unwrap(),
            &PathBuf::from("/etc/brandkit/brandkit.toml")
        );
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = ConfigFilePath::new(
            "does-not-exist-anywhere.toml",
            "brandkit-test-nowhere",
            Some(dir.path().to_path_buf()),
        )
        .into_path();

        assert!(path.is_none());
    }

    #[test]
    fn existing_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("found-me.toml");
        std::fs::write(&file, "port = 1").unwrap();

        let path = ConfigFilePath::new("found-me.toml", "brandkit", Some(dir.path().to_path_buf()))
            .into_path();

        assert_eq!(path, Some(file));
    }
}
