//! Error handling
//!
//! Defines error types and fatal-error reporting for the relay.

pub mod handlers;
pub mod types;

pub use handlers::handle_fatal;
pub use types::*;
