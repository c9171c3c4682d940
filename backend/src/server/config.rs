//! Environment-driven application configuration.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const BASE_URL_VAR: &str = "EMPLOYEE_API_BASE_URL";
const TIMEOUT_VAR: &str = "EMPLOYEE_API_TIMEOUT_MS";
const MAX_ATTEMPTS_VAR: &str = "EMPLOYEE_API_RETRY_MAX_ATTEMPTS";
const INITIAL_DELAY_VAR: &str = "EMPLOYEE_API_RETRY_INITIAL_DELAY_MS";
const MAX_BACKOFF_VAR: &str = "EMPLOYEE_API_RETRY_MAX_BACKOFF_MS";
const BIND_ADDR_VAR: &str = "EMPLOYEE_API_BIND_ADDR";

const DEFAULT_BASE_URL: &str = "http://localhost:8112/api/v1/employee";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_INITIAL_DELAY_MS: u64 = 500;
const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration errors raised during startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{variable} is not a valid URL: {source}")]
    InvalidUrl {
        variable: &'static str,
        source: url::ParseError,
    },
    #[error("{variable} is not a valid number: {source}")]
    InvalidNumber {
        variable: &'static str,
        source: std::num::ParseIntError,
    },
    #[error("{variable} is not a valid socket address: {source}")]
    InvalidAddr {
        variable: &'static str,
        source: std::net::AddrParseError,
    },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream_base_url: Url,
    pub request_timeout: Duration,
    pub max_retry_attempts: u32,
    pub initial_retry_delay: Duration,
    pub max_backoff: Duration,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set but unparseable.
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an injectable variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let upstream_base_url = match lookup(BASE_URL_VAR) {
            Some(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                variable: BASE_URL_VAR,
                source,
            })?,
            None => Url::parse(DEFAULT_BASE_URL).map_err(|source| ConfigError::InvalidUrl {
                variable: BASE_URL_VAR,
                source,
            })?,
        };
        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                variable: BIND_ADDR_VAR,
                source,
            })?;
        Ok(Self {
            upstream_base_url,
            request_timeout: Duration::from_millis(parse_or(
                &lookup,
                TIMEOUT_VAR,
                DEFAULT_TIMEOUT_MS,
            )?),
            max_retry_attempts: parse_or(&lookup, MAX_ATTEMPTS_VAR, DEFAULT_MAX_ATTEMPTS)?,
            initial_retry_delay: Duration::from_millis(parse_or(
                &lookup,
                INITIAL_DELAY_VAR,
                DEFAULT_INITIAL_DELAY_MS,
            )?),
            max_backoff: Duration::from_millis(parse_or(
                &lookup,
                MAX_BACKOFF_VAR,
                DEFAULT_MAX_BACKOFF_MS,
            )?),
            bind_addr,
        })
    }
}

fn parse_or<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    lookup: &impl Fn(&str) -> Option<String>,
    variable: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(variable) {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidNumber { variable, source }),
        None => Ok(default),
    }
}
