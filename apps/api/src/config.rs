//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first when present.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use pharma_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (`HOST`, default 0.0.0.0)
    pub host: IpAddr,

    /// Listen port (`PORT`, default 3000)
    pub port: u16,

    /// Pool and connection settings (`DB_*`, `DATABASE_URL`)
    pub database: DbConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = DbConfig::default();

        let database = DbConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "DB_PORT", defaults.port)?,
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            database: lookup("DB_NAME").unwrap_or(defaults.database),
            url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parse_or(&lookup, "DB_POOL_MAX", defaults.max_connections)?,
            acquire_timeout: millis_or(&lookup, "DB_ACQUIRE_TIMEOUT_MS", defaults.acquire_timeout)?,
            idle_timeout: millis_or(&lookup, "DB_IDLE_TIMEOUT_MS", defaults.idle_timeout)?,
        };

        if database.max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_POOL_MAX".to_string()));
        }

        Ok(ApiConfig {
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(&lookup, "PORT", 3000)?,
            database,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        Some(_) => parse_or(lookup, key, 0u64).map(Duration::from_millis),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3300);
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.database, "pharmacy_database");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(60));
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("DB_HOST", "db"),
            ("DB_PORT", "3306"),
            ("DB_POOL_MAX", "4"),
            ("DB_ACQUIRE_TIMEOUT_MS", "1500"),
            ("DATABASE_URL", "mysql://app@db/pharma"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.acquire_timeout, Duration::from_millis(1500));
        assert_eq!(config.database.connect_url(), "mysql://app@db/pharma");
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");

        assert!(load(&[("DB_POOL_MAX", "0")]).is_err());
        assert!(load(&[("DB_IDLE_TIMEOUT_MS", "-1")]).is_err());
    }
}
