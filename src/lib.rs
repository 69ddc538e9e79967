pub mod client;
pub mod config;
pub mod error;
pub mod peer;
pub mod protocol;
pub mod server;
pub mod utils;

pub use config::RelayConfig;
pub use peer::Peer;
pub use server::Relay;
