//! Error types
//!
//! Defines the two error tiers of the relay: per-client bookkeeping errors
//! and process-level errors that terminate the relay.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Client registry errors
#[derive(Debug, PartialEq, Eq)]
pub enum ClientError {
    CapacityExceeded { capacity: usize },
    SlotNotActive(usize),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::CapacityExceeded { capacity } => {
                write!(f, "Too many clients (capacity {})", capacity)
            }
            ClientError::SlotNotActive(slot) => write!(f, "Slot {} is not active", slot),
        }
    }
}

impl std::error::Error for ClientError {}

/// Errors that stop the relay process.
#[derive(Debug)]
pub enum RelayError {
    Socket(io::Error),
    Bind { addr: SocketAddr, source: io::Error },
    Listen(io::Error),
    Accept(io::Error),
    Client(ClientError),
    Config(config::ConfigError),
    Usage(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Socket(e) => write!(f, "Error creating the socket: {}", e),
            RelayError::Bind { addr, source } => write!(f, "bind error on {}: {}", addr, source),
            RelayError::Listen(e) => write!(f, "listen error: {}", e),
            RelayError::Accept(e) => write!(f, "accept error: {}", e),
            RelayError::Client(e) => write!(f, "{}", e),
            RelayError::Config(e) => write!(f, "Configuration error: {}", e),
            RelayError::Usage(program) => write!(f, "Usage: {} [(optional)port]", program),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Socket(e) | RelayError::Listen(e) | RelayError::Accept(e) => Some(e),
            RelayError::Bind { source, .. } => Some(source),
            RelayError::Client(e) => Some(e),
            RelayError::Config(e) => Some(e),
            RelayError::Usage(_) => None,
        }
    }
}

impl From<ClientError> for RelayError {
    fn from(error: ClientError) -> Self {
        RelayError::Client(error)
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        RelayError::Config(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = RelayError::from(ClientError::CapacityExceeded { capacity: 4 });
        assert_eq!(err.to_string(), "Too many clients (capacity 4)");
    }

    #[test]
    fn test_usage_message() {
        let err = RelayError::Usage("chat-relay".into());
        assert_eq!(err.to_string(), "Usage: chat-relay [(optional)port]");
    }
}
