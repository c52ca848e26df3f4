//! Steam account commands - link or unlink the invoker's Steam id.

use crate::{
    bot::context::{CommandContext, CommandHandler},
    core::user::{self, LinkOutcome},
    errors::{Error, Result},
};
use async_trait::async_trait;

/// Option holding the Steam id or profile URL for `/steam set`.
pub const STEAM_ID_OPTION: &str = "steam_id_or_url";

/// Reply when the input holds no usable Steam id.
pub const NOT_FOUND_MESSAGE: &str = "Sorry, it looks like I was unable to find your Steam ID! \
     Use your 17-digit Steam ID or a `https://steamcommunity.com/profiles/` URL.";

/// Handles `/steam set` and `/steam remove`. All replies are private.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteamLink;

#[async_trait]
impl CommandHandler for SteamLink {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        match ctx.subcommand() {
            Some("set") => set(ctx).await,
            Some("remove") => remove(ctx).await,
            other => Err(Error::Command {
                message: format!("unknown steam subcommand {other:?}"),
            }),
        }
    }
}

async fn set(ctx: &mut CommandContext<'_>) -> Result<()> {
    let input = ctx.string_option(STEAM_ID_OPTION).unwrap_or_default();
    let Some(steam_id) = user::parse_steam_id(input) else {
        return ctx.say_private(NOT_FOUND_MESSAGE).await;
    };

    let discord_id = ctx.invocation().user_id;
    match user::set_steam_id(&ctx.data().database, discord_id, steam_id).await? {
        LinkOutcome::Linked | LinkOutcome::Unchanged => {
            ctx.say_private(format!("Set your Steam ID to: {steam_id}")).await
        }
        LinkOutcome::TakenByAnotherUser => {
            ctx.say_private("❌ That Steam ID is already linked to another Discord account.")
                .await
        }
    }
}

async fn remove(ctx: &mut CommandContext<'_>) -> Result<()> {
    let discord_id = ctx.invocation().user_id;
    if user::remove_user(&ctx.data().database, discord_id).await? {
        ctx.say_private("Removed your Steam ID.").await
    } else {
        ctx.say_private("You don't have a Steam ID saved.").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::{
            context::{Invocation, OptionValue, Reply},
            dispatcher::{DispatchOutcome, INTERNAL_ERROR_MESSAGE, dispatch},
        },
        test_utils::{RecordingResponder, Sent, setup_test_data, test_module},
    };

    const STEAM_ID: i64 = 76_561_198_103_635_351;

    fn set_invocation(user_id: u64, input: &str) -> Invocation {
        Invocation::chat_input("steam", user_id)
            .with_subcommand("set")
            .with_option(STEAM_ID_OPTION, OptionValue::String(input.to_string()))
    }

    #[tokio::test]
    async fn test_set_from_profile_url() -> Result<()> {
        let data = setup_test_data(vec![test_module("steam", SteamLink)]).await?;
        let responder = RecordingResponder::default();
        let invocation =
            set_invocation(7, "https://steamcommunity.com/profiles/76561198103635351/");

        let outcome = dispatch(&data, &invocation, &responder).await;

        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(
            responder.sent(),
            vec![Sent::Reply(Reply::private(
                "Set your Steam ID to: 76561198103635351"
            ))]
        );
        assert_eq!(user::get_steam_id(&data.database, 7).await?, Some(STEAM_ID));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_rejects_vanity_url() -> Result<()> {
        let data = setup_test_data(vec![test_module("steam", SteamLink)]).await?;
        let responder = RecordingResponder::default();

        dispatch(
            &data,
            &set_invocation(7, "https://steamcommunity.com/id/_M1nor"),
            &responder,
        )
        .await;

        assert_eq!(
            responder.sent(),
            vec![Sent::Reply(Reply::private(NOT_FOUND_MESSAGE))]
        );
        assert_eq!(user::get_steam_id(&data.database, 7).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_reports_id_taken_by_another_user() -> Result<()> {
        let data = setup_test_data(vec![test_module("steam", SteamLink)]).await?;
        user::set_steam_id(&data.database, 1, STEAM_ID).await?;
        let responder = RecordingResponder::default();

        dispatch(&data, &set_invocation(2, "76561198103635351"), &responder).await;

        let sent = responder.sent();
        assert!(matches!(
            &sent[..],
            [Sent::Reply(reply)] if reply.ephemeral && reply.content.contains("already linked")
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_linked_and_unlinked() -> Result<()> {
        let data = setup_test_data(vec![test_module("steam", SteamLink)]).await?;
        user::set_steam_id(&data.database, 7, STEAM_ID).await?;
        let remove = Invocation::chat_input("steam", 7).with_subcommand("remove");

        let first = RecordingResponder::default();
        dispatch(&data, &remove, &first).await;
        let second = RecordingResponder::default();
        dispatch(&data, &remove, &second).await;

        assert_eq!(first.sent(), vec![Sent::Reply(Reply::private("Removed your Steam ID."))]);
        assert_eq!(
            second.sent(),
            vec![Sent::Reply(Reply::private("You don't have a Steam ID saved."))]
        );
        assert_eq!(user::get_steam_id(&data.database, 7).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_subcommand_is_an_error() -> Result<()> {
        let data = setup_test_data(vec![test_module("steam", SteamLink)]).await?;
        let responder = RecordingResponder::default();

        let outcome = dispatch(&data, &Invocation::chat_input("steam", 7), &responder).await;

        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(
            responder.sent(),
            vec![Sent::Reply(Reply::private(INTERNAL_ERROR_MESSAGE))]
        );
        Ok(())
    }
}
