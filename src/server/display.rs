//! Roster display
//!
//! Clears the terminal and prints every connected client. Refreshed after
//! each admission, nickname announcement and disconnect.

use std::fmt::Write as _;
use std::io::Write as _;

use crate::client::ClientRegistry;

const CLEAR_SCREEN_ANSI: &str = "\x1b[1;1H\x1b[2J";

pub struct RosterDisplay {
    enabled: bool,
}

impl RosterDisplay {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Redraws the roster on stdout when enabled.
    pub fn refresh<C>(&self, registry: &ClientRegistry<C>) {
        if !self.enabled {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        // A closed stdout only loses the display.
        let _ = write!(stdout, "{}{}", CLEAR_SCREEN_ANSI, render(registry));
        let _ = stdout.flush();
    }
}

/// Renders the roster in slot order.
pub fn render<C>(registry: &ClientRegistry<C>) -> String {
    let mut out = String::from("###Connected Clients###\n");
    for index in registry.active_slots() {
        let address = registry.address(index).unwrap_or_default();
        let nickname = registry.nickname(index).unwrap_or_default();
        let _ = writeln!(out, "Address: {} - Nickname: {}", address, nickname);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_active_slots_in_order() {
        let mut registry = ClientRegistry::new(3);
        registry.allocate((), "10.0.0.1:1".into()).unwrap();
        registry.allocate((), "10.0.0.2:2".into()).unwrap();
        registry.allocate((), "10.0.0.3:3".into()).unwrap();
        registry.set_nickname(2, "gina".into()).unwrap();
        registry.release(1);

        assert_eq!(
            render(&registry),
            "###Connected Clients###\n\
             Address: 10.0.0.1:1 - Nickname: \n\
             Address: 10.0.0.3:3 - Nickname: gina\n"
        );
    }

    #[test]
    fn test_render_empty_roster() {
        let registry: ClientRegistry<()> = ClientRegistry::new(2);
        assert_eq!(render(&registry), "###Connected Clients###\n");
    }
}
