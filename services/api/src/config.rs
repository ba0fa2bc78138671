//! Service configuration, read from `IMS_*` and database environment variables.

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::db::DbConfig;

const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    /// Apply bundled migrations on startup.
    pub dev_mode: bool,
    pub database: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = DbConfig::default();

        let listen_addr = parse_var(&lookup, "IMS_LISTEN_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_LISTEN_ADDR));
        let log_level = lookup("IMS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let dev_mode = lookup("IMS_DEV").is_some_and(|v| parse_flag(&v));

        let database = DbConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS")?
                .unwrap_or(defaults.min_connections),
        };

        Ok(Self {
            listen_addr,
            log_level,
            dev_mode,
            database,
        })
    }
}

/// Parse `key` if it is set.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("invalid {key}: {value:?}"))
        })
        .transpose()
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
