//! Client bookkeeping
//!
//! Slot state and the registry that maps slot indices to connected clients.

pub mod registry;
pub mod state;

pub use registry::ClientRegistry;
pub use state::ClientSlot;
