//! Module `state`
//!
//! Defines the `ClientSlot` struct: one entry of the client registry,
//! holding a connection together with its remote address and nickname.

/// One registry entry. A slot is active exactly when it holds a connection.
///
/// The address is filled when the slot is taken and cleared when it is
/// released; the nickname stays empty until the client announces one.
pub struct ClientSlot<C> {
    connection: Option<C>,
    address: String,
    nickname: String,
}

impl<C> Default for ClientSlot<C> {
    fn default() -> Self {
        Self {
            connection: None,
            address: String::new(),
            nickname: String::new(),
        }
    }
}

impl<C> ClientSlot<C> {
    /// Binds a connection and its remote address to this slot.
    pub(crate) fn occupy(&mut self, connection: C, address: String) {
        self.connection = Some(connection);
        self.address = address;
        self.nickname.clear();
    }

    /// Resets the slot to unused, handing back the connection it held.
    pub(crate) fn vacate(&mut self) -> Option<C> {
        self.address.clear();
        self.nickname.clear();
        self.connection.take()
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns whether the slot currently holds a connection.
    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns the remote address, empty when the slot is unused.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the announced nickname, empty until the client announces one.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.connection.as_mut()
    }

    // --------------------
    // Setter methods
    // --------------------

    /// Sets the nickname. Has no effect on an unused slot.
    pub fn set_nickname(&mut self, nickname: String) {
        if self.is_active() {
            self.nickname = nickname;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_and_vacate() {
        let mut slot = ClientSlot::default();
        assert!(!slot.is_active());
        assert!(slot.address().is_empty());

        slot.occupy(7u32, "10.0.0.2:4000".into());
        slot.set_nickname("dave".into());
        assert!(slot.is_active());
        assert_eq!(slot.address(), "10.0.0.2:4000");
        assert_eq!(slot.nickname(), "dave");

        assert_eq!(slot.vacate(), Some(7));
        assert!(!slot.is_active());
        assert!(slot.address().is_empty());
        assert!(slot.nickname().is_empty());
    }

    #[test]
    fn test_nickname_ignored_on_unused_slot() {
        let mut slot: ClientSlot<u32> = ClientSlot::default();
        slot.set_nickname("ghost".into());
        assert!(slot.nickname().is_empty());
    }
}
