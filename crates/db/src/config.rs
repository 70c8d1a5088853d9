//! Data-source configuration.
//!
//! Everything is read through a lookup function so tests can supply their
//! own variables. [`DataSourceConfig::from_env`] uses the process
//! environment; loading a `.env` file is left to the binary.
//!
//! | Env Var                        | Default  |
//! |--------------------------------|----------|
//! | `DATA_SOURCE_TYPE`             | `local`  |
//! | `POSTGRES_CONNECTION_STRING`   | (none)   |
//! | `POSTGRES_HOST`                | (none)   |
//! | `POSTGRES_PORT`                | (none)   |
//! | `POSTGRES_USER`                | (none)   |
//! | `POSTGRES_PASSWORD`            | (none)   |
//! | `POSTGRES_DB`                  | (none)   |
//! | `POSTGRES_MAX_CONNECTIONS`     | `20`     |
//! | `POSTGRES_IDLE_TIMEOUT`        | `30000`  |
//! | `POSTGRES_CONNECTION_TIMEOUT`  | `5000`   |
//! | `MONGODB_URI`                  | (none)   |
//! | `MONGODB_DB_NAME`              | (none)   |
//!
//! `NEXT_PUBLIC_DATA_SOURCE_TYPE` is honoured when `DATA_SOURCE_TYPE` is unset.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::store::{StoreError, StoreResult};

/// Which backend the selector should build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DataSourceType {
    #[default]
    Local,
    Postgres,
    Mongodb,
}

impl DataSourceType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "postgres" => Some(Self::Postgres),
            "mongodb" => Some(Self::Mongodb),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Postgres => "postgres",
            Self::Mongodb => "mongodb",
        }
    }
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSourceType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            StoreError::Configuration(format!(
                "Unknown data source type '{s}'; expected local, postgres or mongodb"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Relational
// ---------------------------------------------------------------------------

/// Connection pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long an idle connection stays in the pool.
    pub idle_timeout: Duration,
    /// How long to wait for a connection before failing.
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            idle_timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(5_000),
        }
    }
}

/// Relational credentials as read from the environment.
///
/// Fields stay optional until [`PostgresConfig::connect_options`] checks
/// them, so a missing credential is only an error when the relational
/// backend is actually selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Takes precedence over the discrete fields when set.
    pub connection_string: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub pool: PoolSettings,
}

impl PostgresConfig {
    /// Shorthand for a config that only carries a connection string.
    pub fn with_connection_string(url: impl Into<String>) -> Self {
        Self {
            connection_string: Some(url.into()),
            ..Self::default()
        }
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: parse_or(lookup, "POSTGRES_MAX_CONNECTIONS", defaults.max_connections)?,
            idle_timeout: Duration::from_millis(parse_or(
                lookup,
                "POSTGRES_IDLE_TIMEOUT",
                defaults.idle_timeout.as_millis() as u64,
            )?),
            connect_timeout: Duration::from_millis(parse_or(
                lookup,
                "POSTGRES_CONNECTION_TIMEOUT",
                defaults.connect_timeout.as_millis() as u64,
            )?),
        };

        Ok(Self {
            connection_string: non_empty(lookup, "POSTGRES_CONNECTION_STRING"),
            host: non_empty(lookup, "POSTGRES_HOST"),
            port: non_empty(lookup, "POSTGRES_PORT"),
            user: non_empty(lookup, "POSTGRES_USER"),
            password: non_empty(lookup, "POSTGRES_PASSWORD"),
            database: non_empty(lookup, "POSTGRES_DB"),
            pool,
        })
    }

    /// Build connection options, failing with the names of any missing
    /// variables when no connection string is set.
    pub fn connect_options(&self) -> StoreResult<PgConnectOptions> {
        if let Some(url) = &self.connection_string {
            return url.parse::<PgConnectOptions>().map_err(|e| {
                StoreError::Configuration(format!("Invalid POSTGRES_CONNECTION_STRING: {e}"))
            });
        }

        let missing: Vec<&str> = [
            ("POSTGRES_HOST", &self.host),
            ("POSTGRES_PORT", &self.port),
            ("POSTGRES_USER", &self.user),
            ("POSTGRES_PASSWORD", &self.password),
            ("POSTGRES_DB", &self.database),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        let (Some(host), Some(port), Some(user), Some(password), Some(database)) = (
            &self.host,
            &self.port,
            &self.user,
            &self.password,
            &self.database,
        ) else {
            return Err(StoreError::Configuration(format!(
                "PostgreSQL configuration is incomplete. Set POSTGRES_CONNECTION_STRING \
                 or all of the discrete variables (missing: {})",
                missing.join(", ")
            )));
        };

        let port: u16 = port.parse().map_err(|_| {
            StoreError::Configuration(format!("POSTGRES_PORT must be a valid port, got '{port}'"))
        })?;

        Ok(PgConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .password(password)
            .database(database))
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// Document-store credentials as read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

impl MongoConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            uri: non_empty(lookup, "MONGODB_URI"),
            database: non_empty(lookup, "MONGODB_DB_NAME"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataSourceConfig
// ---------------------------------------------------------------------------

/// Selected backend type plus the credentials for every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSourceConfig {
    pub source_type: DataSourceType,
    pub postgres: PostgresConfig,
    pub mongo: MongoConfig,
}

impl DataSourceConfig {
    /// Config for a given backend type with no credentials.
    pub fn of_type(source_type: DataSourceType) -> Self {
        Self {
            source_type,
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Fails on an unknown data source type or unparseable pool settings.
    /// Missing credentials are not checked here.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let source_type = match non_empty(&lookup, "DATA_SOURCE_TYPE")
            .or_else(|| non_empty(&lookup, "NEXT_PUBLIC_DATA_SOURCE_TYPE"))
        {
            Some(name) => name.parse()?,
            None => DataSourceType::Local,
        };

        Ok(Self {
            source_type,
            postgres: PostgresConfig::from_lookup(&lookup)?,
            mongo: MongoConfig::from_lookup(&lookup),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> StoreResult<T> {
    match non_empty(lookup, key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StoreError::Configuration(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_local() {
        let config = DataSourceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.source_type, DataSourceType::Local);
        assert_eq!(config.postgres.pool, PoolSettings::default());
    }

    #[test]
    fn reads_legacy_type_variable() {
        let config =
            DataSourceConfig::from_lookup(lookup(&[("NEXT_PUBLIC_DATA_SOURCE_TYPE", "postgres")]))
                .unwrap();
        assert_eq!(config.source_type, DataSourceType::Postgres);
    }

    #[test]
    fn primary_type_variable_wins() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("DATA_SOURCE_TYPE", "mongodb"),
            ("NEXT_PUBLIC_DATA_SOURCE_TYPE", "postgres"),
        ]))
        .unwrap();
        assert_eq!(config.source_type, DataSourceType::Mongodb);
    }

    #[test]
    fn unknown_type_is_configuration_error() {
        let result = DataSourceConfig::from_lookup(lookup(&[("DATA_SOURCE_TYPE", "redis")]));
        assert_matches!(result, Err(StoreError::Configuration(msg)) if msg.contains("redis"));
    }

    #[test]
    fn pool_settings_are_parsed() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("POSTGRES_MAX_CONNECTIONS", "5"),
            ("POSTGRES_IDLE_TIMEOUT", "1000"),
        ]))
        .unwrap();
        assert_eq!(config.postgres.pool.max_connections, 5);
        assert_eq!(config.postgres.pool.idle_timeout, Duration::from_secs(1));
        assert_eq!(config.postgres.pool.connect_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn bad_pool_setting_is_rejected() {
        let result =
            DataSourceConfig::from_lookup(lookup(&[("POSTGRES_MAX_CONNECTIONS", "lots")]));
        assert_matches!(result, Err(StoreError::Configuration(_)));
    }

    #[test]
    fn missing_discrete_credentials_are_named() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("POSTGRES_HOST", "localhost"),
            ("POSTGRES_USER", "linkhub"),
        ]))
        .unwrap();
        let err = config.postgres.connect_options().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("POSTGRES_PORT"));
        assert!(msg.contains("POSTGRES_PASSWORD"));
        assert!(msg.contains("POSTGRES_DB"));
        assert!(!msg.contains("POSTGRES_USER"));
    }

    #[test]
    fn discrete_credentials_build_options() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("POSTGRES_HOST", "db.internal"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_USER", "linkhub"),
            ("POSTGRES_PASSWORD", "secret"),
            ("POSTGRES_DB", "links"),
        ]))
        .unwrap();
        let options = config.postgres.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("links"));
    }

    #[test]
    fn connection_string_takes_precedence() {
        let config = PostgresConfig::with_connection_string("postgres://u:p@example.com:5433/d");
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "example.com");
        assert_eq!(options.get_port(), 5433);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let config = PostgresConfig {
            host: Some("h".into()),
            port: Some("eighty".into()),
            user: Some("u".into()),
            password: Some("p".into()),
            database: Some("d".into()),
            ..PostgresConfig::default()
        };
        assert_matches!(config.connect_options(), Err(StoreError::Configuration(_)));
    }

    #[test]
    fn mongo_credentials_are_read() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_DB_NAME", "linkhub"),
        ]))
        .unwrap();
        assert_eq!(config.mongo.database.as_deref(), Some("linkhub"));
    }
}
