//! Runtime configuration read once at startup.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
pub const DEFAULT_DB_POOL_SIZE: u32 = 10;
pub const DEFAULT_SERVICE_NAME: &str = "ladle-server";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_ttl_days: i64,
    pub db_pool_size: u32,
    /// OTLP collector, e.g. `http://localhost:4317`. Console logging only when unset.
    pub otel_endpoint: Option<String>,
    pub otel_service_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_or(&lookup, "LADLE_BIND_ADDR", || {
            DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| invalid("LADLE_BIND_ADDR", DEFAULT_BIND_ADDR))
        })?;

        let session_ttl_days: i64 =
            parse_or(&lookup, "LADLE_SESSION_TTL_DAYS", || Ok(DEFAULT_SESSION_TTL_DAYS))?;
        if session_ttl_days < 1 {
            return Err(invalid("LADLE_SESSION_TTL_DAYS", &session_ttl_days.to_string()));
        }

        let db_pool_size: u32 =
            parse_or(&lookup, "LADLE_DB_POOL_SIZE", || Ok(DEFAULT_DB_POOL_SIZE))?;
        if db_pool_size == 0 {
            return Err(invalid("LADLE_DB_POOL_SIZE", "0"));
        }

        Ok(Config {
            database_url,
            bind_addr,
            session_ttl_days,
            db_pool_size,
            otel_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty()),
            otel_service_name: lookup("OTEL_SERVICE_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        })
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}

fn parse_or<F, T, D>(lookup: &F, name: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    D: FnOnce() -> Result<T, ConfigError>,
{
    match lookup(name).filter(|v| !v.is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, &raw)),
        None => default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/ladle")]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.session_ttl_days, DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(config.db_pool_size, DEFAULT_DB_POOL_SIZE);
        assert_eq!(config.otel_service_name, DEFAULT_SERVICE_NAME);
        assert!(config.otel_endpoint.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/ladle"),
            ("LADLE_BIND_ADDR", "127.0.0.1:8080"),
            ("LADLE_SESSION_TTL_DAYS", "7"),
            ("LADLE_DB_POOL_SIZE", "4"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.db_pool_size, 4);
        assert_eq!(
            config.otel_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db/ladle"),
            ("LADLE_DB_POOL_SIZE", "lots"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "LADLE_DB_POOL_SIZE",
                ..
            }
        ));

        let err = load(&[
            ("DATABASE_URL", "postgres://db/ladle"),
            ("LADLE_SESSION_TTL_DAYS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "LADLE_SESSION_TTL_DAYS",
                ..
            }
        ));
    }
}
