//! Serenity event handler for interactions.
//!
//! Converts gateway interactions into [`Invocation`]s and answers them through a
//! [`SerenityResponder`]. Serenity runs each event in its own task, so interactions are
//! dispatched concurrently.

use crate::{
    bot::{
        BotData,
        context::{InteractionKind, InteractionResponder, Invocation, OptionValue, Reply},
        dispatcher::dispatch,
    },
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::{collections::HashMap, sync::Arc};
use tracing::info;

fn scalar_value(value: &serenity::CommandDataOptionValue) -> Option<OptionValue> {
    match value {
        serenity::CommandDataOptionValue::String(s) => Some(OptionValue::String(s.clone())),
        serenity::CommandDataOptionValue::Integer(i) => Some(OptionValue::Integer(*i)),
        serenity::CommandDataOptionValue::Number(n) => Some(OptionValue::Number(*n)),
        serenity::CommandDataOptionValue::Boolean(b) => Some(OptionValue::Boolean(*b)),
        _ => None,
    }
}

fn scalar_options(options: &[serenity::CommandDataOption]) -> HashMap<String, OptionValue> {
    options
        .iter()
        .filter_map(|option| Some((option.name.clone(), scalar_value(&option.value)?)))
        .collect()
}

/// Builds an [`Invocation`] from a command interaction.
///
/// Only scalar options are carried over. When a subcommand was invoked, its name is
/// recorded and its own options replace the top-level ones. Subcommand groups,
/// attachments and mentionables are not used by any handler.
#[must_use]
pub fn invocation_from_command(command: &serenity::CommandInteraction) -> Invocation {
    let kind = if command.data.kind == serenity::CommandType::ChatInput {
        InteractionKind::ChatInput
    } else {
        InteractionKind::Other
    };

    let (subcommand, options) = match command.data.options.first() {
        Some(serenity::CommandDataOption {
            name,
            value: serenity::CommandDataOptionValue::SubCommand(nested),
            ..
        }) => (Some(name.clone()), scalar_options(nested)),
        _ => (None, scalar_options(&command.data.options)),
    };

    Invocation {
        kind,
        command_name: command.data.name.clone(),
        user_id: command.user.id.get(),
        subcommand,
        options,
    }
}

/// Answers one command interaction over Discord's REST API.
pub struct SerenityResponder<'a> {
    http: &'a Arc<serenity::Http>,
    command: &'a serenity::CommandInteraction,
}

impl<'a> SerenityResponder<'a> {
    /// Creates a responder for `command`.
    #[must_use]
    pub const fn new(
        http: &'a Arc<serenity::Http>,
        command: &'a serenity::CommandInteraction,
    ) -> Self {
        Self { http, command }
    }
}

#[async_trait]
impl InteractionResponder for SerenityResponder<'_> {
    async fn reply(&self, reply: Reply) -> Result<()> {
        let message = serenity::CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        self.command
            .create_response(self.http, serenity::CreateInteractionResponse::Message(message))
            .await?;
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        let message = serenity::CreateInteractionResponseMessage::new().ephemeral(ephemeral);
        self.command
            .create_response(self.http, serenity::CreateInteractionResponse::Defer(message))
            .await?;
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<()> {
        let followup = serenity::CreateInteractionResponseFollowup::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        self.command.create_followup(self.http, followup).await?;
        Ok(())
    }
}

/// Gateway event handler holding the shared bot data.
pub struct InteractionHandler {
    data: Arc<BotData>,
}

impl InteractionHandler {
    /// Creates a handler dispatching against `data`.
    #[must_use]
    pub const fn new(data: Arc<BotData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl serenity::EventHandler for InteractionHandler {
    async fn ready(&self, _ctx: serenity::Context, ready: serenity::Ready) {
        info!("Logged in as {}!", ready.user.name);
    }

    async fn interaction_create(&self, ctx: serenity::Context, interaction: serenity::Interaction) {
        // Autocomplete, components and modals never reach a command handler
        let serenity::Interaction::Command(command) = interaction else {
            return;
        };

        let invocation = invocation_from_command(&command);
        let responder = SerenityResponder::new(&ctx.http, &command);
        dispatch(&self.data, &invocation, &responder).await;
    }
}
