//! Configuration shared with the rest of the pool service.
//!
//! Only the sections this crate reads are modelled: the locale key, the
//! logger, and the database client. Every field has a default, so an empty
//! file is a valid configuration.

use crate::error::{QueryError, QueryResult};
use serde::Deserialize;
use std::path::Path;
use tokio_postgres::config::{Host, SslMode};
use tracing::Level;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identifier: String,
    pub language: Language,
    pub logger: LoggerConfig,
    pub client: ClientConfig,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> QueryResult<Self> {
        toml::from_str(raw).map_err(|e| QueryError::config(format!("failed to parse config: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            QueryError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }
}

/// Locale key for user-facing text. Statement building does not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warning,
    #[default]
    Log,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_colors: bool,
    pub log_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_colors: true,
            log_level: LogLevel::Log,
        }
    }
}

impl LoggerConfig {
    /// The `tracing` level statements are logged at.
    pub fn level(&self) -> Level {
        match self.log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warning => Level::WARN,
            LogLevel::Log => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            tls: false,
        }
    }
}

impl ClientConfig {
    /// Read a `postgres://` URL or key/value connection string into a client
    /// section. Only TCP hosts are supported; a URL asking for TLS
    /// (`sslmode=require`) sets `tls`.
    pub fn from_database_url(database_url: &str) -> QueryResult<Self> {
        let pg: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| QueryError::Connection(e.to_string()))?;

        let defaults = Self::default();
        let host = match pg.get_hosts().first() {
            None => defaults.host,
            Some(Host::Tcp(host)) => host.clone(),
            #[allow(unreachable_patterns)]
            Some(_) => {
                return Err(QueryError::Connection(
                    "only TCP database hosts are supported".to_string(),
                ));
            }
        };

        Ok(Self {
            host,
            port: pg.get_ports().first().copied().unwrap_or(defaults.port),
            username: pg.get_user().unwrap_or_default().to_string(),
            password: pg
                .get_password()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default(),
            database: pg.get_dbname().unwrap_or_default().to_string(),
            tls: pg.get_ssl_mode() == SslMode::Require,
        })
    }

    /// Connection settings for `tokio-postgres`. Empty credentials are left unset.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host).port(self.port);
        if !self.username.is_empty() {
            pg.user(&self.username);
        }
        if !self.password.is_empty() {
            pg.password(&self.password);
        }
        if !self.database.is_empty() {
            pg.dbname(&self.database);
        }
        if self.tls {
            pg.ssl_mode(SslMode::Require);
        }
        pg
    }
}
