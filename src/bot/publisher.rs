//! Command publisher - replaces the application's global commands with the loaded set.
//!
//! Publishing is a single bulk overwrite, so commands removed from the `commands`
//! directory disappear from Discord on the next start. Failures are logged and the bot
//! keeps running with whatever Discord already had.

use crate::{
    bot::{definition::CommandDefinition, registry::CommandRegistry},
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Remote endpoint that stores an application's global commands.
#[async_trait]
pub trait CommandSync: Send + Sync {
    /// Replaces every global command with `commands`, returning how many the remote now
    /// holds.
    async fn replace_global_commands(&self, commands: &[CommandDefinition]) -> Result<usize>;
}

/// [`CommandSync`] backed by Discord's REST API.
pub struct DiscordCommandSync {
    http: Arc<serenity::Http>,
}

impl DiscordCommandSync {
    /// Creates a REST client for `application_id` authenticated with `token`.
    #[must_use]
    pub fn new(token: &str, application_id: u64) -> Self {
        let http = serenity::Http::new(token);
        http.set_application_id(serenity::ApplicationId::new(application_id));
        Self {
            http: Arc::new(http),
        }
    }
}

#[async_trait]
impl CommandSync for DiscordCommandSync {
    async fn replace_global_commands(&self, commands: &[CommandDefinition]) -> Result<usize> {
        // PUT /applications/{application.id}/commands
        let registered = self.http.create_global_commands(&commands).await?;
        Ok(registered.len())
    }
}

/// Publishes every definition in `registry` through `sync`.
///
/// Returns whether the remote accepted the new command set. Errors are logged, never
/// propagated, and never retried.
#[instrument(skip_all, fields(commands = registry.len()))]
pub async fn publish_commands(registry: &CommandRegistry, sync: &dyn CommandSync) -> bool {
    let definitions = registry.definitions();
    info!("Starting application command refresh...");

    match sync.replace_global_commands(&definitions).await {
        Ok(count) => {
            info!("Successfully refreshed {count} application command(s)");
            true
        }
        Err(e) => {
            warn!("Could not refresh application commands: {e}");
            false
        }
    }
}
