//! Invocation context handed to command handlers.
//!
//! Handlers never talk to Discord directly. They reply through a [`CommandContext`],
//! which forwards to an [`InteractionResponder`] and remembers whether the interaction
//! has already been answered or deferred. The dispatcher uses that state to pick the
//! right channel for error replies.

use crate::{bot::BotData, errors::Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Kind of application command an interaction invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// A slash command typed in the chat input
    ChatInput,
    /// User or message context-menu commands
    Other,
}

/// A resolved option value from an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Text value
    String(String),
    /// Whole number value
    Integer(i64),
    /// Floating point value
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

/// Framework-independent view of one inbound command interaction.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Which kind of command was invoked
    pub kind: InteractionKind,
    /// Name of the invoked command
    pub command_name: String,
    /// Discord id of the invoking user
    pub user_id: u64,
    /// Name of the invoked subcommand, if the command has subcommands
    pub subcommand: Option<String>,
    /// Options keyed by name, taken from the subcommand when one was invoked
    pub options: HashMap<String, OptionValue>,
}

impl Invocation {
    /// Creates a chat input invocation with no options.
    #[must_use]
    pub fn chat_input(command_name: impl Into<String>, user_id: u64) -> Self {
        Self {
            kind: InteractionKind::ChatInput,
            command_name: command_name.into(),
            user_id,
            subcommand: None,
            options: HashMap::new(),
        }
    }

    /// Sets the invoked subcommand.
    #[must_use]
    pub fn with_subcommand(mut self, name: impl Into<String>) -> Self {
        self.subcommand = Some(name.into());
        self
    }

    /// Adds an option value.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

/// A message sent back to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text
    pub content: String,
    /// Whether only the invoker can see the message
    pub ephemeral: bool,
}

impl Reply {
    /// A reply visible to everyone in the channel.
    #[must_use]
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A reply visible only to the invoker.
    #[must_use]
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Sends responses for a single interaction.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Sends the initial response.
    async fn reply(&self, reply: Reply) -> Result<()>;

    /// Acknowledges the interaction so the answer can be sent later as a follow-up.
    async fn defer(&self, ephemeral: bool) -> Result<()>;

    /// Sends an additional message after the initial response or deferral.
    async fn follow_up(&self, reply: Reply) -> Result<()>;
}

/// The handler half of a command module.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command. Errors are reported to the invoker by the dispatcher.
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()>;
}

/// Everything a handler can see and do while running.
pub struct CommandContext<'a> {
    data: &'a BotData,
    invocation: &'a Invocation,
    responder: &'a dyn InteractionResponder,
    replied: bool,
    deferred: bool,
}

impl<'a> CommandContext<'a> {
    /// Creates a context for an interaction that has not been answered yet.
    #[must_use]
    pub fn new(
        data: &'a BotData,
        invocation: &'a Invocation,
        responder: &'a dyn InteractionResponder,
    ) -> Self {
        Self {
            data,
            invocation,
            responder,
            replied: false,
            deferred: false,
        }
    }

    /// Shared bot state.
    #[must_use]
    pub const fn data(&self) -> &'a BotData {
        self.data
    }

    /// The interaction being handled.
    #[must_use]
    pub const fn invocation(&self) -> &'a Invocation {
        self.invocation
    }

    /// Name of the invoked subcommand, if any.
    #[must_use]
    pub fn subcommand(&self) -> Option<&'a str> {
        self.invocation.subcommand.as_deref()
    }

    /// Returns the string option `name`, if it was supplied.
    #[must_use]
    pub fn string_option(&self, name: &str) -> Option<&'a str> {
        match self.invocation.options.get(name) {
            Some(OptionValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer option `name`, if it was supplied.
    #[must_use]
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        match self.invocation.options.get(name) {
            Some(OptionValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Whether an initial response has been sent.
    #[must_use]
    pub const fn is_replied(&self) -> bool {
        self.replied
    }

    /// Whether the interaction has been deferred.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Sends a public message.
    pub async fn say(&mut self, content: impl Into<String> + Send) -> Result<()> {
        self.send(Reply::public(content)).await
    }

    /// Sends a message only the invoker can see.
    pub async fn say_private(&mut self, content: impl Into<String> + Send) -> Result<()> {
        self.send(Reply::private(content)).await
    }

    /// Sends `reply` as the initial response, or as a follow-up once the interaction has
    /// been answered or deferred.
    pub async fn send(&mut self, reply: Reply) -> Result<()> {
        if self.replied || self.deferred {
            self.responder.follow_up(reply).await
        } else {
            self.responder.reply(reply).await?;
            self.replied = true;
            Ok(())
        }
    }

    /// Defers the response. Does nothing if the interaction was already answered.
    pub async fn defer(&mut self) -> Result<()> {
        if self.replied || self.deferred {
            return Ok(());
        }
        self.responder.defer(false).await?;
        self.deferred = true;
        Ok(())
    }
}
