//! Client registry
//!
//! Fixed-capacity table of client slots addressed by index. New
//! connections take the lowest free index; released slots are reused.

use crate::client::state::ClientSlot;
use crate::error::ClientError;
use tokio::net::TcpStream;

/// Registry for tracking connected clients.
pub struct ClientRegistry<C = TcpStream> {
    slots: Vec<ClientSlot<C>>,
    highest_active_index: Option<usize>,
}

impl<C> ClientRegistry<C> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| ClientSlot::default()).collect(),
            highest_active_index: None,
        }
    }

    /// Stores `connection` in the lowest unused slot and returns its index.
    pub fn allocate(&mut self, connection: C, address: String) -> Result<usize, ClientError> {
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_active())
            .ok_or(ClientError::CapacityExceeded {
                capacity: self.slots.len(),
            })?;

        self.slots[index].occupy(connection, address);
        if self.highest_active_index.is_none_or(|highest| index > highest) {
            self.highest_active_index = Some(index);
        }
        Ok(index)
    }

    /// Resets the slot to unused and returns the connection it held.
    ///
    /// Releasing an unused or out-of-range slot does nothing. The scan bound
    /// is left untouched.
    pub fn release(&mut self, index: usize) -> Option<C> {
        self.slots.get_mut(index).and_then(ClientSlot::vacate)
    }

    pub fn set_nickname(&mut self, index: usize, nickname: String) -> Result<(), ClientError> {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_active() => {
                slot.set_nickname(nickname);
                Ok(())
            }
            _ => Err(ClientError::SlotNotActive(index)),
        }
    }

    /// Indices of active slots, ascending. Each call starts a fresh scan.
    pub fn active_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(index, _)| index)
    }

    /// Slot indices the dispatcher has to look at: `0..=highest_active_index`.
    pub fn scan_range(&self) -> std::ops::Range<usize> {
        0..self.highest_active_index.map_or(0, |highest| highest + 1)
    }

    /// Highest index ever handed out. Never decreases when a slot is released.
    pub fn highest_active_index(&self) -> Option<usize> {
        self.highest_active_index
    }

    pub fn get(&self, index: usize) -> Option<&ClientSlot<C>> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClientSlot<C>> {
        self.slots.get_mut(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.get(index).is_some_and(ClientSlot::is_active)
    }

    /// Remote address of an active slot.
    pub fn address(&self, index: usize) -> Option<&str> {
        self.get(index)
            .filter(|slot| slot.is_active())
            .map(ClientSlot::address)
    }

    /// Nickname of an active slot (possibly empty).
    pub fn nickname(&self, index: usize) -> Option<&str> {
        self.get(index)
            .filter(|slot| slot.is_active())
            .map(ClientSlot::nickname)
    }

    /// Connection held by an active slot.
    pub fn connection(&self, index: usize) -> Option<&C> {
        self.get(index).and_then(ClientSlot::connection)
    }

    /// Number of active slots.
    pub fn len(&self) -> usize {
        self.active_slots().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
