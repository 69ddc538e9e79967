use log::{debug, error, info, warn};
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use tokio::net::TcpStream;

use crate::client::ClientRegistry;
use crate::config::RelayConfig;
use crate::error::{ClientError, RelayError};
use crate::protocol::frame::content_of;
use crate::protocol::{BUFLEN, Frame, Message, RawFrame};
use crate::server::broadcast::{broadcast, send_frame};
use crate::server::display::RosterDisplay;
use crate::server::listener;
use crate::server::reactor::Reactor;

/// Result of draining a readable client socket once.
enum Drained {
    /// Bytes were read; the stream may or may not have ended after them.
    Frame(RawFrame),
    /// End-of-stream with nothing read.
    Closed,
    /// Readiness was spurious; nothing to do.
    Empty,
    Failed(io::Error),
}

/// The relay: one listener, one registry and the loop that multiplexes them.
pub struct Relay {
    reactor: Reactor,
    registry: ClientRegistry,
    display: RosterDisplay,
    config: RelayConfig,
}

impl Relay {
    /// Binds the listening socket. Must be called from within a tokio runtime.
    pub fn bind(config: RelayConfig) -> Result<Self, RelayError> {
        let listener = listener::bind(&config)?;
        Ok(Self {
            reactor: Reactor::new(listener),
            registry: ClientRegistry::new(config.max_clients),
            display: RosterDisplay::new(config.display_roster),
            config,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.reactor.local_addr()
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Runs the relay until a fatal error occurs.
    pub async fn run(mut self) -> Result<(), RelayError> {
        info!(
            "Starting chat relay on {} (max {} clients)",
            self.local_addr().map_err(RelayError::Socket)?,
            self.registry.capacity()
        );
        self.display.refresh(&self.registry);

        loop {
            self.turn().await?;
        }
    }

    /// Waits for one wake of the reactor and services everything that became
    /// ready: the new connection first, then client slots in ascending order.
    pub async fn turn(&mut self) -> Result<(), RelayError> {
        let readiness = match self.reactor.wait(&self.registry).await {
            Ok(readiness) => readiness,
            Err(e) => return self.accept_failed(e),
        };

        let mut remaining = readiness.count();

        if let Some((stream, addr)) = readiness.incoming {
            self.admit(stream, addr)?;
            remaining -= 1;
            if remaining == 0 {
                return Ok(());
            }
        }

        for index in readiness.clients {
            self.dispatch(index);
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        Ok(())
    }

    /// Accept failures end the relay unless configured to be retried.
    fn accept_failed(&self, e: io::Error) -> Result<(), RelayError> {
        if self.config.fatal_accept_errors {
            return Err(RelayError::Accept(e));
        }
        warn!("Error accepting connection: {}", e);
        Ok(())
    }

    /// Admits a new connection: pushes the current roster to it, then gives it
    /// a slot.
    fn admit(&mut self, mut stream: TcpStream, addr: SocketAddr) -> Result<(), RelayError> {
        let address = addr.to_string();

        for index in self.registry.active_slots() {
            let frame = Frame::NewUser {
                nickname: self.registry.nickname(index).unwrap_or_default().to_string(),
                address: self.registry.address(index).unwrap_or_default().to_string(),
            };
            if let Err(e) = send_frame(&mut stream, &frame) {
                debug!("Dropped roster entry {} for {}: {}", index, address, e);
            }
        }

        match self.registry.allocate(stream, address) {
            Ok(index) => {
                info!(
                    "Client connected: {} in slot {} ({}/{} clients)",
                    addr,
                    index,
                    self.registry.len(),
                    self.registry.capacity()
                );
                self.display.refresh(&self.registry);
                Ok(())
            }
            Err(e @ ClientError::CapacityExceeded { .. }) if self.config.reject_when_full => {
                warn!("Rejected {}: {}", addr, e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drains one frame from a ready slot and routes it.
    fn dispatch(&mut self, index: usize) {
        let Some(stream) = self.registry.connection(index) else {
            return;
        };

        match drain(stream) {
            Drained::Frame(raw) => self.route(index, content_of(&raw)),
            Drained::Closed => {
                info!("Connection closed by client {}", self.address_of(index));
                self.disconnect(index);
            }
            Drained::Failed(e) => {
                warn!("Failed to read from {}: {}", self.address_of(index), e);
                self.disconnect(index);
            }
            Drained::Empty => {}
        }
    }

    /// Anything that is not an announcement is relayed as chat, including a
    /// frame whose content is empty.
    fn route(&mut self, index: usize, content: &[u8]) {
        let address = self.address_of(index);

        match Message::parse(content) {
            Message::Announce { nickname, content } => {
                info!("Client {} is now known as {:?}", address, nickname);
                if let Err(e) = self.registry.set_nickname(index, nickname) {
                    error!("Announcement from {}: {}", address, e);
                }
                let frame = Frame::Announce { content, address };
                broadcast(&mut self.registry, &frame, Some(index));
                self.display.refresh(&self.registry);
            }
            Message::Chat { payload } => {
                debug!("Relaying {} bytes from {}", payload.len(), address);
                let frame = Frame::Chat {
                    address: address.clone(),
                    payload,
                };
                let report = broadcast(&mut self.registry, &frame, Some(index));
                if report.dropped > 0 {
                    warn!(
                        "Chat from {} reached {} of {} peers",
                        address,
                        report.delivered,
                        report.delivered + report.dropped
                    );
                }
            }
        }
    }

    /// Tells every other client that `index` left, then frees the slot.
    fn disconnect(&mut self, index: usize) {
        let address = self.address_of(index);
        let frame = Frame::UserLeft {
            address: address.clone(),
        };
        broadcast(&mut self.registry, &frame, Some(index));

        // Dropping the stream closes it and removes it from the watched set.
        drop(self.registry.release(index));
        info!(
            "Client {} disconnected ({}/{} clients)",
            address,
            self.registry.len(),
            self.registry.capacity()
        );
        self.display.refresh(&self.registry);
    }

    fn address_of(&self, index: usize) -> String {
        self.registry.address(index).unwrap_or_default().to_string()
    }
}

/// Reads whatever is immediately available, up to one frame.
fn drain(stream: &TcpStream) -> Drained {
    let mut buf = [0u8; BUFLEN];
    let mut filled = 0;
    let mut closed = false;

    while filled < BUFLEN {
        match stream.try_read(&mut buf[filled..]) {
            Ok(0) => {
                closed = true;
                break;
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::WouldBlock => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Drained::Failed(e),
        }
    }

    match (filled, closed) {
        (0, true) => Drained::Closed,
        (0, false) => Drained::Empty,
        _ => Drained::Frame(buf),
    }
}
