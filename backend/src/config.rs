//! Server settings, read from the environment after `.env` has been loaded

use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";
const DEV_JWT_SECRET: &str = "chess-development-secret";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CHESS_BIND_ADDR is not a socket address: {0}")]
    BindAddr(String),

    #[error("CHESS_JWT_SECRET must not be empty")]
    EmptySecret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("CHESS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_addr))?;

        let jwt_secret = lookup("CHESS_JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        if jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        Ok(ServerConfig {
            bind_addr,
            jwt_secret,
            log_filter: lookup("CHESS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_filter, "info");
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CHESS_BIND_ADDR", "127.0.0.1:9000"),
            ("CHESS_JWT_SECRET", "s3cret"),
            ("CHESS_LOG", "backend=debug"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.log_filter, "backend=debug");
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("CHESS_BIND_ADDR", "localhost")])),
            Err(ConfigError::BindAddr("localhost".to_string()))
        );
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("CHESS_JWT_SECRET", "")])),
            Err(ConfigError::EmptySecret)
        );
    }
}
