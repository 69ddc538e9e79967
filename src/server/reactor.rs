//! Event multiplexer
//!
//! The single point where the relay waits. One wait covers the listener and
//! every connection held by the registry, so the watched set is always the
//! listener plus the active slots: taking a slot registers a connection and
//! releasing it deregisters it.

use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};
use tokio::net::{TcpListener, TcpStream};

use crate::client::ClientRegistry;

/// What became ready during one wake.
#[derive(Debug, Default)]
pub struct Readiness {
    /// Connection accepted from the listener, if it was ready.
    pub incoming: Option<(TcpStream, SocketAddr)>,
    /// Ready client slots, ascending.
    pub clients: Vec<usize>,
}

impl Readiness {
    /// Number of ready sources, listener included.
    pub fn count(&self) -> usize {
        usize::from(self.incoming.is_some()) + self.clients.len()
    }
}

/// Readiness reactor over the listening socket and the registry's connections.
pub struct Reactor {
    listener: TcpListener,
}

impl Reactor {
    pub fn new(listener: TcpListener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits, without timeout, until the listener or at least one client
    /// connection is readable.
    ///
    /// An error is only returned when accepting on the listener fails.
    /// Client sockets in an error state are reported as ready so the
    /// following read surfaces the failure.
    pub async fn wait(&self, registry: &ClientRegistry) -> io::Result<Readiness> {
        poll_fn(|cx| self.poll_ready(cx, registry)).await
    }

    fn poll_ready(
        &self,
        cx: &mut Context<'_>,
        registry: &ClientRegistry,
    ) -> Poll<io::Result<Readiness>> {
        let incoming = match self.listener.poll_accept(cx) {
            Poll::Ready(Ok(accepted)) => Some(accepted),
            Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
            Poll::Pending => None,
        };

        let clients: Vec<usize> = registry
            .scan_range()
            .filter(|&index| {
                registry
                    .connection(index)
                    .is_some_and(|stream| stream.poll_read_ready(cx).is_ready())
            })
            .collect();

        if incoming.is_none() && clients.is_empty() {
            Poll::Pending
        } else {
            Poll::Ready(Ok(Readiness { incoming, clients }))
        }
    }
}
