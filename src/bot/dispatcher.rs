//! Interaction dispatcher - routes one invocation to its command handler.
//!
//! Each interaction moves through `received -> filtered -> dispatched` and ends either
//! `completed` or `failed`. Only chat input commands get past the filter. Unknown
//! command names are logged and dropped without replying to the user. Handler errors
//! and panics are logged and answered with a single private error message.

use crate::{
    bot::{
        BotData,
        context::{CommandContext, InteractionKind, InteractionResponder, Invocation, Reply},
    },
    errors::Error,
};
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Message shown to the invoker when a handler fails.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "There was an internal error while executing this command.";

/// How a dispatched interaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a chat input command; dropped without a reply
    Ignored,
    /// No command with that name is registered; dropped without a reply
    UnknownCommand,
    /// The handler ran to completion
    Completed,
    /// The handler returned an error or panicked, and the invoker was notified
    Failed,
}

/// Dispatches `invocation` to its registered handler.
pub async fn dispatch(
    data: &BotData,
    invocation: &Invocation,
    responder: &dyn InteractionResponder,
) -> DispatchOutcome {
    if invocation.kind != InteractionKind::ChatInput {
        return DispatchOutcome::Ignored;
    }

    let name = invocation.command_name.as_str();
    let Some(command) = data.registry.get(name) else {
        warn!("No command matching `{name}` was found");
        return DispatchOutcome::UnknownCommand;
    };

    let mut ctx = CommandContext::new(data, invocation, responder);
    let result = AssertUnwindSafe(command.handler.execute(&mut ctx))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())));

    match result {
        Ok(()) => {
            debug!("Command `{name}` completed for user {}", invocation.user_id);
            DispatchOutcome::Completed
        }
        Err(e) => {
            error!("Error in command `{name}`: {e}");

            let reply = Reply::private(INTERNAL_ERROR_MESSAGE);
            let sent = if ctx.is_replied() || ctx.is_deferred() {
                responder.follow_up(reply).await
            } else {
                responder.reply(reply).await
            };
            if let Err(e) = sent {
                error!("Failed to send error message: {e}");
            }

            DispatchOutcome::Failed
        }
    }
}

/// Converts a caught panic payload into a command error.
fn panic_error(payload: &(dyn Any + Send)) -> Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    Error::Command {
        message: format!("handler panicked: {message}"),
    }
}
