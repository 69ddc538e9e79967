//! Module `peer`
//!
//! Client side of the relay protocol: connect, announce a nickname, send
//! chat, and receive decoded frames.

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::protocol::frame::pad;
use crate::protocol::{BUFLEN, NEWUSER, RawFrame, ServerFrame};

/// A connection to a relay.
pub struct Peer {
    stream: TcpStream,
}

impl Peer {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    /// Local address of the connection, as the relay reports it to others.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// Announces (or changes) this peer's nickname.
    pub async fn announce(&mut self, nickname: &str) -> io::Result<()> {
        let mut content = Vec::with_capacity(nickname.len() + 1);
        content.push(NEWUSER);
        content.extend_from_slice(nickname.as_bytes());
        self.send_raw(&pad(&content)).await
    }

    /// Sends a chat message.
    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.send_raw(&pad(text.as_bytes())).await
    }

    pub async fn send_raw(&mut self, frame: &RawFrame) -> io::Result<()> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await
    }

    /// Waits for the next frame from the relay.
    ///
    /// Returns `UnexpectedEof` once the relay closes the connection.
    pub async fn receive(&mut self) -> io::Result<ServerFrame> {
        let mut buf = [0u8; BUFLEN];
        self.stream.read_exact(&mut buf).await?;
        Ok(ServerFrame::parse(&buf))
    }

    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
