//! Unified error type for Lobby Locator.
//!
//! Every fallible operation in the crate returns [`Result`]. Startup steps that are
//! allowed to fail softly (command loading, publishing, catalog sync) catch these
//! errors and log them instead of propagating.

use thiserror::Error;

/// All errors that can occur while running the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command definition file could not be turned into a command module
    #[error("Malformed command file {file}: {reason}")]
    MalformedCommand {
        /// File name of the rejected command file
        file: String,
        /// Why the file was rejected
        reason: String,
    },

    /// A command handler failed while executing
    #[error("Command execution error: {message}")]
    Command {
        /// Description of the failure
        message: String,
    },

    /// HTTP error from the Steam client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the Discord client
    #[error("Discord client error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
