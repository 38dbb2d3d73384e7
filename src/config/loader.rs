//! Configuration Loader
//!
//! Environment-aware loading built on the `config` crate. Sources are merged
//! in precedence order:
//!
//! 1. struct defaults
//! 2. `config/gamify.toml`, then `config/gamify.<env>.toml` (both optional)
//! 3. `GAMIFY__SECTION__KEY` environment variables
//! 4. `DATABASE_URL`, which wins over every other database URL source

use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::GamifyConfig;
use crate::error::Result;

const ENV_PREFIX: &str = "GAMIFY";
const ENV_SEPARATOR: &str = "__";
const CONFIG_FILE_STEM: &str = "gamify";

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    env::var("GAMIFY_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Builder for a [`GamifyConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_directory: PathBuf,
    environment: String,
    read_process_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader for `./config` that honours process environment variables
    pub fn new() -> Self {
        Self {
            config_directory: PathBuf::from("config"),
            environment: detect_environment(),
            read_process_env: true,
        }
    }

    /// Loader that only reads files, for tests and tooling that must not be
    /// influenced by the calling shell
    pub fn files_only(config_directory: impl Into<PathBuf>, environment: &str) -> Self {
        Self {
            config_directory: config_directory.into(),
            environment: environment.to_string(),
            read_process_env: false,
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Merge every source and validate the result
    pub fn load(&self) -> Result<GamifyConfig> {
        let base_file = self.config_directory.join(format!("{CONFIG_FILE_STEM}.toml"));
        let env_file = self
            .config_directory
            .join(format!("{CONFIG_FILE_STEM}.{}.toml", self.environment));

        debug!(
            environment = %self.environment,
            config_directory = %self.config_directory.display(),
            "Loading configuration"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&base_file.to_string_lossy(), FileFormat::Toml).required(false))
            .add_source(File::new(&env_file.to_string_lossy(), FileFormat::Toml).required(false));

        if self.read_process_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
            if let Ok(database_url) = env::var("DATABASE_URL") {
                builder = builder.set_override("database.url", database_url)?;
            }
        }

        let config: GamifyConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            config = %config.sanitized(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}
