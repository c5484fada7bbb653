// Database settings: defaults, then an optional TOML file, then environment

use repokit_core::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix, e.g. `REPOKIT_DATABASE__URL`
pub const ENV_PREFIX: &str = "REPOKIT";

/// Connection settings for the SQLite adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// sqlx connection URL (`sqlite://path.db`, `sqlite::memory:`)
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub foreign_keys: bool,
    /// Whether the linked SQLite understands `INSERT ... RETURNING` (3.35+).
    /// Decides how repositories read back inserted rows.
    pub supports_returning: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout_ms: 5_000,
            foreign_keys: true,
            supports_returning: false,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    database: DatabaseSettings,
}

impl DatabaseSettings {
    /// Load settings from the `[database]` table of `path` (if given), with
    /// `REPOKIT_DATABASE__*` environment variables taking precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&SettingsFile::default()).map_err(config_error)?;

        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let file: SettingsFile = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        file.database.validate()?;
        Ok(file.database)
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::Config("database.url must not be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_error(err: ::config::ConfigError) -> AppError {
    AppError::Config(err.to_string())
}
