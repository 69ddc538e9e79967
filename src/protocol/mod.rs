//! Relay wire protocol
//!
//! Fixed-size frame layout, tag bytes, and classification of received frames.

pub mod frame;
pub mod messages;

pub use frame::{BUFLEN, DELIM, Frame, NEWUSER, RawFrame, USERLEFT};
pub use messages::{Message, ServerFrame};
