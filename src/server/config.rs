//! Score server configuration from the environment

use std::fmt;

use thiserror::Error;

const DATABASE_URL_VAR: &str = "POSTGRES_URL";
const BIND_ADDRESS_VAR: &str = "BIND_ADDRESS";
const POOL_SIZE_VAR: &str = "POSTGRES_POOL_SIZE";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a positive integer (got `{value}`)")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    pub bind_address: String,
    /// Connection pool size
    pub max_connections: usize,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings carry credentials
        f.debug_struct("ServerConfig")
            .field("database_url", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ServerConfigError::Missing(DATABASE_URL_VAR))?;

        let bind_address = lookup(BIND_ADDRESS_VAR)
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let max_connections = match lookup(POOL_SIZE_VAR) {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ServerConfigError::Invalid {
                        name: POOL_SIZE_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            database_url,
            bind_address,
            max_connections,
        })
    }
}
