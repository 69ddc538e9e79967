//! Configuration management for the chat relay
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `RELAY_*` environment variables. The port given on the command
//! line is applied last by the caller.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Port used when neither the configuration nor the command line sets one.
pub const DEFAULT_PORT: u16 = 7000;

/// Registry capacity used when the configuration does not set one.
pub const DEFAULT_MAX_CLIENTS: usize = 32;

/// Config file looked up in the working directory (extension optional).
const DEFAULT_CONFIG_FILE: &str = "relay";

/// Environment variable naming an alternative config file.
const CONFIG_PATH_VAR: &str = "RELAY_CONFIG";

/// Complete relay configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    // ═══ NETWORK ═══
    /// IPv4 address the listener binds to
    pub bind_address: String,

    /// Listening port
    pub port: u16,

    /// Registry capacity, also used as the listen backlog
    pub max_clients: usize,

    // ═══ BEHAVIOR ═══
    /// Clear the terminal and print the roster whenever it changes
    pub display_roster: bool,

    /// Terminate the process when `accept` fails instead of retrying
    pub fatal_accept_errors: bool,

    /// Close connections beyond `max_clients` instead of terminating
    pub reject_when_full: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            display_roster: true,
            fatal_accept_errors: true,
            reject_when_full: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the config file (if any) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from the given file path with environment overrides.
    /// A missing file is not an error.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("RELAY").try_parsing(true))
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with the port replaced, as given on the command line.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.bind_address.parse::<Ipv4Addr>().is_err() {
            return Err(config::ConfigError::Message(format!(
                "bind_address must be an IPv4 address, got {:?}",
                self.bind_address
            )));
        }

        Ok(())
    }

    /// Bind address and port as a socket address
    pub fn listen_socket(&self) -> Result<SocketAddr, config::ConfigError> {
        let ip = self.bind_address.parse::<Ipv4Addr>().map_err(|e| {
            config::ConfigError::Message(format!("invalid bind_address: {}", e))
        })?;
        Ok(SocketAddr::V4(SocketAddrV4::new(ip, self.port)))
    }

    /// Listen backlog handed to the OS
    pub fn backlog(&self) -> u32 {
        u32::try_from(self.max_clients).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_clients, DEFAULT_MAX_CLIENTS);
        assert!(config.fatal_accept_errors);
        assert!(!config.reject_when_full);
        assert_eq!(
            config.listen_socket().unwrap(),
            "0.0.0.0:7000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RelayConfig::load_from("definitely/not/here/relay").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_cli_port_overrides() {
        let config = RelayConfig::default().with_port(Some(9000));
        assert_eq!(config.port, 9000);
        let config = config.with_port(None);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_validate_rejects_zero_clients() {
        let config = RelayConfig {
            max_clients: 0,
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ipv6() {
        let config = RelayConfig {
            bind_address: "::1".into(),
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
