//! Server core functionality
//!
//! This module contains the relay's event loop, the reactor it waits on,
//! and the listener, broadcaster and roster display it drives.

pub mod broadcast;
pub mod core;
pub mod display;
pub mod listener;
pub mod reactor;

pub use broadcast::{BroadcastReport, broadcast, send_frame};
pub use self::core::Relay;
pub use reactor::{Reactor, Readiness};
