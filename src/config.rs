//! Relay configuration loaded from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "ASSISTANT_API_URL";
pub const BIND_ADDR_VAR: &str = "RELAY_BIND_ADDR";
pub const CONNECT_TIMEOUT_VAR: &str = "RELAY_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 3030);
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for the relay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the assistant backend, without a trailing slash
    pub api_url: String,
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Connect timeout for backend requests
    pub connect_timeout: Duration,
}

impl RelayConfig {
    /// Create a configuration with defaults for everything but the backend URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.into()),
            bind_addr: DEFAULT_BIND_ADDR,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Set the listen address
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Set the backend connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: API_URL_VAR,
                value: api_url,
            });
        }

        let bind_addr = match lookup(BIND_ADDR_VAR) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                value: raw.clone(),
            })?,
            None => DEFAULT_BIND_ADDR,
        };

        let connect_timeout = match lookup(CONNECT_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    var: CONNECT_TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self::new(api_url)
            .with_bind_addr(bind_addr)
            .with_connect_timeout(connect_timeout))
    }
}

pub(crate) fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
