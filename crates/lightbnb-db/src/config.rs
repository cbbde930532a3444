//! Connection and logging settings.
//!
//! Settings come either from a TOML file:
//!
//! ```toml
//! [database]
//! url = "${DATABASE_URL}"
//! max_connections = 8
//! query_timeout_ms = 5000
//! slow_query_ms = 250
//! log_sql = true
//! ```
//!
//! or from the environment (after loading `.env`): `DATABASE_URL`,
//! `LIGHTBNB_MAX_CONNECTIONS`, `LIGHTBNB_QUERY_TIMEOUT_MS`,
//! `LIGHTBNB_SLOW_QUERY_MS`, `LIGHTBNB_LOG_SQL`.

use crate::error::{DbError, DbResult};
use crate::monitor::MonitorConfig;
use crate::pool::DEFAULT_MAX_CONNECTIONS;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbConfig {
    #[serde(rename = "url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,
    #[serde(default)]
    pub slow_query_ms: Option<u64>,
    #[serde(default = "default_log_sql")]
    pub log_sql: bool,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    database: DbConfig,
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

fn default_log_sql() -> bool {
    true
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            query_timeout_ms: None,
            slow_query_ms: None,
            log_sql: true,
        }
    }

    /// Load `[database]` from a TOML file, expanding `${VAR}` references in the URL.
    pub fn load(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DbError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw, |key| std::env::var(key).ok()).map_err(|e| match e {
            DbError::Config(msg) => DbError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse a TOML document, resolving `${VAR}` through `lookup`.
    pub fn from_toml_str(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let file: ConfigFile =
            toml::from_str(raw).map_err(|e| DbError::config(format!("invalid config: {e}")))?;
        let mut config = file.database;
        config.database_url = expand_env_vars(&config.database_url, &lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings from the process environment, loading `.env` first if present.
    pub fn from_env() -> DbResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup (the environment, in practice).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| DbError::config("DATABASE_URL is not set"))?;

        let mut config = Self::new(database_url);
        if let Some(v) = lookup("LIGHTBNB_MAX_CONNECTIONS") {
            config.max_connections = parse_setting("LIGHTBNB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("LIGHTBNB_QUERY_TIMEOUT_MS") {
            config.query_timeout_ms = Some(parse_setting("LIGHTBNB_QUERY_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = lookup("LIGHTBNB_SLOW_QUERY_MS") {
            config.slow_query_ms = Some(parse_setting("LIGHTBNB_SLOW_QUERY_MS", &v)?);
        }
        if let Some(v) = lookup("LIGHTBNB_LOG_SQL") {
            config.log_sql = parse_setting("LIGHTBNB_LOG_SQL", &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(DbError::config("database url must not be empty"));
        }
        if self.max_connections == 0 {
            return Err(DbError::config("max_connections must be at least 1"));
        }
        Ok(())
    }

    /// The statement logging/timeout settings these values describe.
    pub fn monitor_config(&self) -> MonitorConfig {
        let mut monitor = MonitorConfig::new();
        if let Some(ms) = self.query_timeout_ms {
            monitor = monitor.with_query_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.slow_query_ms {
            monitor = monitor.with_slow_query_threshold(Duration::from_millis(ms));
        }
        if !self.log_sql {
            monitor = monitor.without_sql_log();
        }
        monitor
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, value: &str) -> DbResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DbError::config(format!("{key}={value:?}: {e}")))
}

fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> DbResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(DbError::config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(DbError::config("invalid env var reference: ${}"));
            }

            let v = lookup(&key).ok_or_else(|| {
                DbError::config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
