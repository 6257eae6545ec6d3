//! Server configuration read from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use catalog_core::query::PaginationConfig;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:26000";

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Pagination defaults and upper bound.
    pub pagination: PaginationConfig,
    /// Maximum pooled database connections.
    pub database_max_connections: u32,
    /// How long a request may wait for a pooled connection.
    pub database_acquire_timeout: Duration,
    /// How long in-flight requests may drain after a shutdown signal.
    pub graceful_shutdown_timeout: Duration,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;
        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = parse("BIND_ADDR", &bind_addr)?;

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_offset: parse_or(&get, "DEFAULT_OFFSET", defaults.default_offset)?,
            default_limit: parse_or(&get, "DEFAULT_LIMIT", defaults.default_limit)?,
            max_limit: parse_or(&get, "DEFAULT_MAXIMUM_LIMIT", defaults.max_limit)?,
        };
        pagination.validate().map_err(AppError::Config)?;

        Ok(Self {
            database_url,
            bind_addr,
            pagination,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            database_acquire_timeout: Duration::from_secs(parse_or(
                &get,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
            graceful_shutdown_timeout: Duration::from_secs(parse_or(
                &get,
                "GRACEFUL_SHUTDOWN_TIMEOUT_SECS",
                5,
            )?),
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} is invalid: {e}")))
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    get(key).map_or(Ok(default), |raw| parse(key, &raw))
}
