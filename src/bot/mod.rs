//! Bot layer - command loading, publishing, and interaction dispatch.
//!
//! This module ties the Discord gateway to the command registry: definitions are loaded
//! from disk, published as global commands, and every inbound interaction is routed to
//! its handler by the dispatcher.

/// Built-in command handlers (ping, help, game, steam)
pub mod commands;
/// Per-interaction context, responder seam, and handler trait
pub mod context;
/// Slash command definitions in Discord's wire schema
pub mod definition;
/// Routing of interactions to command handlers
pub mod dispatcher;
/// Discord gateway event handlers
pub mod handlers;
/// Global command publishing
pub mod publisher;
/// Command discovery and the name to module registry
pub mod registry;

use crate::errors::Result;
use poise::serenity_prelude as serenity;
use registry::CommandRegistry;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shared data available to every command invocation.
///
/// Built once at startup after commands are loaded and never mutated afterwards.
#[derive(Debug)]
pub struct BotData {
    /// Commands available to users, keyed by name
    pub registry: CommandRegistry,
    /// Database connection holding the game catalog
    pub database: DatabaseConnection,
}

impl BotData {
    /// Creates a new `BotData` from the loaded registry and database connection.
    #[must_use]
    pub const fn new(registry: CommandRegistry, database: DatabaseConnection) -> Self {
        Self { registry, database }
    }
}

/// Logs in and handles gateway events until the connection ends.
///
/// Login failures are returned to the caller unchanged.
#[instrument(skip_all)]
pub async fn run_bot(token: &str, data: Arc<BotData>) -> Result<()> {
    let intents = serenity::GatewayIntents::GUILDS;

    info!("Setting up Serenity client...");
    let mut client = serenity::Client::builder(token, intents)
        .event_handler(handlers::InteractionHandler::new(data))
        .await
        .inspect_err(|e| tracing::error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| tracing::error!("Client error: {e:?}"))?;

    Ok(())
}
