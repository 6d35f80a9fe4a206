//! Configuration management for the spy cats service.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8080`.
//! - `DATABASE_PATH` - Optional. SQLite database file. Defaults to `spy_cats.db`.
//!   Use `:memory:` for a transient database.
//! - `BREED_REGISTRY_URL` - Optional. Cat breed catalog. Defaults to TheCatAPI breeds endpoint.
//! - `BREED_REGISTRY_TIMEOUT_SECS` - Optional. Registry request timeout. Defaults to `10`.
//! - `BREED_CACHE_TTL_SECS` - Optional. How long a fetched breed list is reused.
//!   Defaults to `300`; `0` disables caching.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Public catalog of recognised cat breeds.
pub const DEFAULT_BREED_REGISTRY_URL: &str = "https://api.thecatapi.com/v1/breeds";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Breed registry client configuration.
#[derive(Debug, Clone)]
pub struct BreedRegistryConfig {
    /// Endpoint returning a JSON array of `{ "name": ... }` objects
    pub url: String,

    /// Upper bound on a single registry request
    pub timeout: Duration,

    /// How long a fetched breed list stays valid (zero disables caching)
    pub cache_ttl: Duration,
}

impl Default for BreedRegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BREED_REGISTRY_URL.to_string(),
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite database location
    pub database_path: PathBuf,

    /// Breed registry settings
    pub breeds: BreedRegistryConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse
    /// or the registry timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_env("PORT", 8080u16)?;

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("spy_cats.db"));

        let url = std::env::var("BREED_REGISTRY_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BREED_REGISTRY_URL.to_string());

        let timeout_secs = parse_env("BREED_REGISTRY_TIMEOUT_SECS", 10u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "BREED_REGISTRY_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cache_ttl_secs = parse_env("BREED_CACHE_TTL_SECS", 300u64)?;

        Ok(Self {
            host,
            port,
            database_path,
            breeds: BreedRegistryConfig {
                url,
                timeout: Duration::from_secs(timeout_secs),
                cache_ttl: Duration::from_secs(cache_ttl_secs),
            },
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path,
            breeds: BreedRegistryConfig::default(),
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        _ => Ok(default),
    }
}
