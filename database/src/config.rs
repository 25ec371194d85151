use std::{path::Path, str::FromStr};

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::DatabaseError;

/// Backend name that selects the built-in fixture data instead of SQLite.
pub const FIXTURES: &str = "fixtures";

/// Storage backend settings. In a YAML config file they live under a
/// `database:` key:
///
/// ```yaml
/// database:
///   url: "sqlite::memory:"
///   pool_size: 5
/// ```
///
/// SQLite URLs such as `sqlite::memory:` must be quoted there, since a
/// trailing unquoted `:` would start a nested mapping.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    5
}

#[derive(Deserialize)]
struct YamlFile {
    database: Option<DatabaseConfig>,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: default_pool_size(),
        }
    }

    /// Resolve the backend: CLI flag, then `DATABASE_URL`, then the
    /// `database` section of the YAML file, then the fixture data.
    pub fn from_cli_or_env_or_yaml(
        cli_arg: Option<String>,
        yaml_path: Option<&Path>,
    ) -> Result<Self, DatabaseError> {
        if let Some(arg) = cli_arg {
            return Ok(Self::new(arg));
        }
        if let Ok(env) = std::env::var("DATABASE_URL") {
            return Ok(Self::new(env));
        }
        if let Some(config) = yaml_path.map(Self::from_yaml_file).transpose()?.flatten() {
            return Ok(config);
        }
        Ok(Self::new(FIXTURES))
    }

    fn from_yaml_file(path: &Path) -> Result<Option<Self>, DatabaseError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Option<Self>, DatabaseError> {
        let file: YamlFile =
            serde_yaml::from_str(text).map_err(|e| DatabaseError::Config(e.to_string()))?;
        Ok(file.database)
    }

    pub fn is_fixtures(&self) -> bool {
        self.url.eq_ignore_ascii_case(FIXTURES)
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// `sqlite:` URLs are parsed as such; anything else is a file path.
    pub fn connect_options(&self) -> Result<SqliteConnectOptions, DatabaseError> {
        let options = if self.url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(&self.url)
                .map_err(|e| DatabaseError::Config(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&self.url)
        };
        Ok(options.create_if_missing(true))
    }

    pub async fn create_pool(&self) -> Result<SqlitePool, DatabaseError> {
        let options = self.connect_options()?;
        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if self.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(self.pool_size.max(1))
        };
        pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}
