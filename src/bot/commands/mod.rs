//! Built-in command handlers.
//!
//! Handlers are compiled into the binary and referenced by key from the `execute` field
//! of command files. A command file naming a key that is not in
//! [`builtin_handlers`] is rejected at load time.

/// Game catalog search
pub mod game;

/// General utility commands
pub mod general;

/// Steam account linking
pub mod steam;

use crate::bot::registry::HandlerCatalog;

pub use game::GameSearch;
pub use general::{Help, Ping};
pub use steam::SteamLink;

/// Catalog of every handler command files may reference.
#[must_use]
pub fn builtin_handlers() -> HandlerCatalog {
    HandlerCatalog::new()
        .with("ping", Ping)
        .with("help", Help)
        .with("game", GameSearch)
        .with("steam", SteamLink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_handlers_registered() {
        let catalog = builtin_handlers();
        assert_eq!(catalog.len(), 4);
        for key in ["ping", "help", "game", "steam"] {
            assert!(catalog.get(key).is_some(), "missing {key}");
        }
    }
}
