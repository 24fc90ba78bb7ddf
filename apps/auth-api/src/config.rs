//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the process
//! exits with a clear error before binding the listener.

use std::env;

use thiserror::Error;

use orvia_auth::HashCost;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Runtime configuration for the auth service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URL.
    pub database_url: String,

    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub listen_addr: String,

    /// Secret for deriving per-session client encryption keys.
    pub client_encryption_secret: String,

    /// Base URL of the settings service. When unset, two-factor login is
    /// considered disabled for every account.
    pub settings_base_url: Option<String>,

    /// Log filter directive, e.g. `info,orvia=debug`.
    pub rust_log: String,

    /// Argon2id cost parameters.
    pub hash_cost: HashCost,

    /// Pool size ceiling.
    pub max_db_connections: u32,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let client_encryption_secret = require("CLIENT_ENCRYPTION_SECRET")?;
        if client_encryption_secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CLIENT_ENCRYPTION_SECRET".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let settings_base_url = env::var("SETTINGS_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string());
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let defaults = HashCost::recommended();
        let hash_cost = HashCost {
            memory_kib: parse_or("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or("ARGON2_PARALLELISM", defaults.parallelism)?,
        };
        let max_db_connections = parse_or("MAX_DB_CONNECTIONS", 10)?;

        Ok(Self {
            database_url,
            listen_addr,
            client_encryption_secret,
            settings_base_url,
            rust_log,
            hash_cost,
            max_db_connections,
        })
    }
}

fn require(var: &str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var.to_string()))
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: var.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state, so each uses distinct variables.

    #[test]
    fn missing_required_var_is_reported() {
        std::env::remove_var("DATABASE_URL");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn parse_or_rejects_garbage() {
        std::env::set_var("MAX_DB_CONNECTIONS_TEST", "not-a-number");
        let result: Result<u32, _> = parse_or("MAX_DB_CONNECTIONS_TEST", 10);
        assert!(result.is_err());
        std::env::remove_var("MAX_DB_CONNECTIONS_TEST");
    }

    #[test]
    fn parse_or_defaults_when_unset() {
        std::env::remove_var("UNSET_NUMERIC_VAR");
        let value: u32 = parse_or("UNSET_NUMERIC_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
