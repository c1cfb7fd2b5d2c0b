//! Database configuration loading
//!
//! Settings are read from `TESTGRID_DB_*` environment variables (after
//! loading a `.env` file, if present). Durations are given in seconds.
//!
//! * `TESTGRID_DB_URL` - PostgreSQL connection string
//! * `TESTGRID_DB_MAX_CONNECTIONS` - Pool size upper bound (default: 10)
//! * `TESTGRID_DB_MIN_CONNECTIONS` - Idle connections kept open (default: 2)
//! * `TESTGRID_DB_CONNECT_TIMEOUT_SECS` - Acquire timeout (default: 30)
//! * `TESTGRID_DB_MAX_LIFETIME_SECS` - Connection lifetime (default: 1800)
//! * `TESTGRID_DB_IDLE_TIMEOUT_SECS` - Idle timeout (default: 600)

use config::{Config, Environment, Source};
use serde::Deserialize;
use std::time::Duration;

use crate::error::DatabaseError;
use crate::pool::DatabaseConfig;

/// Environment variable prefix for database settings
pub const ENV_PREFIX: &str = "TESTGRID_DB";

/// Raw settings as they appear in the environment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
            min_connections: defaults.min_connections,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            max_lifetime_secs: defaults.max_lifetime.as_secs(),
            idle_timeout_secs: defaults.idle_timeout.as_secs(),
        }
    }
}

impl From<DatabaseSettings> for DatabaseConfig {
    fn from(settings: DatabaseSettings) -> Self {
        DatabaseConfig::new(settings.url)
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
    }
}

impl DatabaseConfig {
    /// Loads configuration from `TESTGRID_DB_*` environment variables
    ///
    /// A `.env` file in the working directory is loaded first, if one exists.
    /// Unset variables fall back to the defaults of [`DatabaseConfig::new`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` if a variable cannot be parsed
    pub fn from_env() -> Result<Self, DatabaseError> {
        dotenvy::dotenv().ok();
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Loads configuration from any `config` source
    pub fn from_source<S>(source: S) -> Result<Self, DatabaseError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings: DatabaseSettings = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if settings.min_connections > settings.max_connections {
            return Err(DatabaseError::Configuration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                settings.min_connections, settings.max_connections
            )));
        }

        Ok(settings.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = DatabaseConfig::from_source(File::from_str("", FileFormat::Toml)).unwrap();
        let defaults = DatabaseConfig::default();

        assert_eq!(config.url, defaults.url);
        assert_eq!(config.max_connections, defaults.max_connections);
        assert_eq!(config.idle_timeout, defaults.idle_timeout);
    }

    #[test]
    fn test_overrides_and_durations() {
        let source = File::from_str(
            r#"
            url = "postgres://grid:grid@db:5432/testgrid"
            max_connections = 25
            connect_timeout_secs = 5
            "#,
            FileFormat::Toml,
        );

        let config = DatabaseConfig::from_source(source).unwrap();

        assert_eq!(config.url, "postgres://grid:grid@db:5432/testgrid");
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_min_above_max() {
        let source = File::from_str(
            "max_connections = 2\nmin_connections = 8",
            FileFormat::Toml,
        );

        let error = DatabaseConfig::from_source(source).unwrap_err();
        assert!(matches!(error, DatabaseError::Configuration(_)));
    }

    #[test]
    fn test_environment_variables_map_to_settings() {
        let vars = config::Map::from([
            ("TESTGRID_DB_URL".to_string(), "postgres://grid:grid@db:5432/testgrid".to_string()),
            ("TESTGRID_DB_MAX_CONNECTIONS".to_string(), "33".to_string()),
            ("TESTGRID_DB_CONNECT_TIMEOUT_SECS".to_string(), "7".to_string()),
            ("UNRELATED_MAX_CONNECTIONS".to_string(), "1".to_string()),
        ]);
        let source = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(vars));

        let config = DatabaseConfig::from_source(source).unwrap();

        assert_eq!(config.url, "postgres://grid:grid@db:5432/testgrid");
        assert_eq!(config.max_connections, 33);
        assert_eq!(config.connect_timeout, Duration::from_secs(7));
        assert_eq!(config.min_connections, DatabaseConfig::default().min_connections);
    }

    #[test]
    fn test_rejects_unparseable_value() {
        let source = File::from_str("max_connections = \"lots\"", FileFormat::Toml);
        assert!(DatabaseConfig::from_source(source).is_err());
    }
}
