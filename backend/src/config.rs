//! Runtime configuration.
//!
//! Resolved once at process startup and handed to [`crate::initialize_backend`]
//! and [`crate::create_router`]. Request handlers never read the environment.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

pub const DATABASE_URL_VAR: &str = "CLINIC_DATABASE_URL";
pub const ADDR_VAR: &str = "CLINIC_ADDR";
pub const ALLOWED_ORIGIN_VAR: &str = "CLINIC_ALLOWED_ORIGIN";

const DEFAULT_DATABASE_URL: &str = "sqlite:clinic.db";
// The browser pages call http://localhost:3000
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} cannot be empty")]
    Empty { var: &'static str },
    #[error("invalid listen address in CLINIC_ADDR: {value}")]
    InvalidAddr { value: String },
    #[error("invalid origin in CLINIC_ALLOWED_ORIGIN: {value}")]
    InvalidOrigin { value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    database_url: String,
    addr: SocketAddr,
    /// `None` lets any origin call the API (pages opened from `file://`)
    allowed_origin: Option<HeaderValue>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup(DATABASE_URL_VAR) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    var: DATABASE_URL_VAR,
                })
            }
            Some(url) => url,
            None => DEFAULT_DATABASE_URL.to_string(),
        };

        let addr_value = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr { value: addr_value })?;

        let allowed_origin = match lookup(ALLOWED_ORIGIN_VAR) {
            Some(origin) if origin.trim().is_empty() => None,
            Some(origin) => Some(
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| ConfigError::InvalidOrigin { value: origin })?,
            ),
            None => None,
        };

        Ok(Self {
            database_url,
            addr,
            allowed_origin,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn allowed_origin(&self) -> Option<&HeaderValue> {
        self.allowed_origin.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_url(), "sqlite:clinic.db");
        assert_eq!(config.addr(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(config.allowed_origin().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (DATABASE_URL_VAR, "sqlite:/tmp/other.db"),
            (ADDR_VAR, "0.0.0.0:8000"),
            (ALLOWED_ORIGIN_VAR, "http://localhost:8080"),
        ]))
        .unwrap();

        assert_eq!(config.database_url(), "sqlite:/tmp/other.db");
        assert_eq!(config.addr().port(), 8000);
        assert_eq!(
            config.allowed_origin().unwrap(),
            &HeaderValue::from_static("http://localhost:8080")
        );
    }

    #[test]
    fn test_invalid_addr_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(ADDR_VAR, "not an address")]));
        assert!(matches!(result, Err(ConfigError::InvalidAddr { .. })));
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(DATABASE_URL_VAR, "  ")]));
        assert!(matches!(result, Err(ConfigError::Empty { .. })));
    }

    #[test]
    fn test_blank_origin_means_any() {
        let config = Config::from_lookup(lookup_from(&[(ALLOWED_ORIGIN_VAR, "")])).unwrap();
        assert!(config.allowed_origin().is_none());
    }
}
