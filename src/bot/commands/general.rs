//! General Discord commands - ping and help.
//! These commands don't touch the database and provide basic bot functionality.

use crate::{
    bot::context::{CommandContext, CommandHandler},
    errors::Result,
};
use async_trait::async_trait;
use std::fmt::Write;

/// Responds with "Pong!" to test bot connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.say("Pong!").await
    }
}

/// Lists every registered command with its description.
#[derive(Debug, Clone, Copy, Default)]
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let mut help_text = String::from("**Lobby Locator Help**\n");
        for definition in ctx.data().registry.definitions() {
            let _ = write!(help_text, "\n• `/{}` - {}", definition.name, definition.description);
        }

        ctx.say_private(help_text).await
    }
}
