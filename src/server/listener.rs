//! Listening socket setup
//!
//! Creates the relay's IPv4 listening socket with `SO_REUSEADDR` set.
//! Every failure here is fatal to the relay.

use log::info;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Binds and listens on the configured address. Must be called from within
/// a tokio runtime.
pub fn bind(config: &RelayConfig) -> Result<TcpListener, RelayError> {
    let addr: SocketAddr = config.listen_socket()?;

    let socket = TcpSocket::new_v4().map_err(RelayError::Socket)?;
    socket.set_reuseaddr(true).map_err(RelayError::Socket)?;
    socket
        .bind(addr)
        .map_err(|source| RelayError::Bind { addr, source })?;

    let listener = socket.listen(config.backlog()).map_err(RelayError::Listen)?;
    info!(
        "Relay bound to {} (backlog {})",
        listener.local_addr().unwrap_or(addr),
        config.backlog()
    );
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback(port: u16) -> RelayConfig {
        RelayConfig {
            bind_address: "127.0.0.1".into(),
            port,
            ..RelayConfig::default()
        }
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind(&loopback(0)).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let first = bind(&loopback(0)).unwrap();
        let port = first.local_addr().unwrap().port();
        match bind(&loopback(port)) {
            Err(RelayError::Bind { addr, .. }) => assert_eq!(addr.port(), port),
            other => panic!("expected bind error, got {:?}", other.map(|_| ())),
        }
    }
}
