//! Discord gateway event handlers.
//!
//! Bridges Serenity's event stream to the framework-independent dispatcher.

/// Interaction and ready event handling
pub mod interaction;

pub use interaction::InteractionHandler;
