use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::infrastructure::memory_store::DEFAULT_LOCK_TIMEOUT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// How long a caller waits for an order's lock before getting `Busy`.
    pub lock_timeout: Duration,
    pub seed_demo_orders: bool,
}

impl Config {
    /// Reads `HOST`, `PORT`, `ORDER_LOCK_TIMEOUT_MS` and `SEED_DEMO_ORDERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a valid port number",
                value,
            })?,
            None => 8080,
        };

        let lock_timeout = match lookup("ORDER_LOCK_TIMEOUT_MS") {
            Some(value) => value
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: "ORDER_LOCK_TIMEOUT_MS",
                    expected: "a number of milliseconds",
                    value,
                })?,
            None => DEFAULT_LOCK_TIMEOUT,
        };

        let seed_demo_orders = match lookup("SEED_DEMO_ORDERS") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "SEED_DEMO_ORDERS",
                expected: "true or false",
                value,
            })?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            lock_timeout,
            seed_demo_orders,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
