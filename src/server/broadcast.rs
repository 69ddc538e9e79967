//! Module `broadcast`
//!
//! Fans frames out to connected clients.
//!
//! Delivery is best-effort and never suspends the relay: each frame is
//! handed to the socket only as far as its send buffer allows. A recipient
//! whose buffer is full loses the frame. Failed writes are counted and
//! logged but never disconnect the recipient and are never retried. A dead
//! or stalled peer is only noticed when its own socket next reports
//! end-of-stream or an error on read.

use log::debug;
use std::io::{self, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll, Waker};
use tokio::io::AsyncWrite;

use crate::client::ClientRegistry;
use crate::protocol::Frame;

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Writes as much of `raw` as the connection accepts right now.
///
/// Fails with `WouldBlock` when nothing could be written and with
/// `WriteZero` when the frame was cut short; either way the caller treats
/// the frame as lost for this recipient.
pub fn try_write_all<W>(conn: &mut W, raw: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut cx = Context::from_waker(Waker::noop());
    let mut written = 0;

    while written < raw.len() {
        match Pin::new(&mut *conn).poll_write(&mut cx, &raw[written..]) {
            Poll::Ready(Ok(0)) => return Err(ErrorKind::WriteZero.into()),
            Poll::Ready(Ok(n)) => written += n,
            Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
            Poll::Ready(Err(e)) => return Err(e),
            Poll::Pending if written == 0 => return Err(ErrorKind::WouldBlock.into()),
            Poll::Pending => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("frame cut short after {} bytes", written),
                ));
            }
        }
    }
    Ok(())
}

/// Writes one encoded frame to a single connection without waiting.
pub fn send_frame<W>(conn: &mut W, frame: &Frame) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    try_write_all(conn, &frame.encode())
}

/// Writes `frame` to every active slot except `exclude`, in ascending slot
/// order.
pub fn broadcast<W>(
    registry: &mut ClientRegistry<W>,
    frame: &Frame,
    exclude: Option<usize>,
) -> BroadcastReport
where
    W: AsyncWrite + Unpin,
{
    let raw = frame.encode();
    let mut report = BroadcastReport::default();

    for index in registry.scan_range() {
        if Some(index) == exclude {
            continue;
        }
        let Some(slot) = registry.get_mut(index) else {
            continue;
        };
        let Some(conn) = slot.connection_mut() else {
            continue;
        };

        match try_write_all(conn, &raw) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                debug!("Dropped frame for slot {} ({}): {}", index, slot.address(), e);
                report.dropped += 1;
            }
        }
    }

    report
}
