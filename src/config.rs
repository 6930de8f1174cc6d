//! Process configuration
//!
//! The bind address comes from the first command-line argument, then the
//! `PORT` environment variable, then [`DEFAULT_ADDR`].

use std::env;

use tracing::warn;

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address to bind the listener to
    pub addr: String,
}

impl Config {
    /// Read configuration from the command line and environment
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), env::var("PORT").ok())
    }

    fn resolve(arg: Option<String>, port: Option<String>) -> Self {
        if let Some(addr) = arg {
            return Self { addr };
        }

        let addr = match port {
            Some(port) => match port.trim().parse::<u16>() {
                Ok(port) => format!("0.0.0.0:{}", port),
                Err(_) => {
                    warn!("Ignoring invalid PORT '{}', using {}", port, DEFAULT_ADDR);
                    DEFAULT_ADDR.to_string()
                }
            },
            None => DEFAULT_ADDR.to_string(),
        };
        Self { addr }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_wins() {
        let config = Config::resolve(Some("127.0.0.1:9000".to_string()), Some("7000".to_string()));
        assert_eq!(config.addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_port_env() {
        let config = Config::resolve(None, Some("7000".to_string()));
        assert_eq!(config.addr, "0.0.0.0:7000");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::resolve(None, Some("seventy".to_string()));
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_default() {
        assert_eq!(Config::default().addr, DEFAULT_ADDR);
    }
}
