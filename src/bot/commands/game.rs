//! Game catalog command - looks up games imported from Steam.

use crate::{
    bot::context::{CommandContext, CommandHandler},
    core::game,
    entities::GameModel,
    errors::Result,
};
use async_trait::async_trait;
use std::fmt::Write;

/// Most matches listed in one reply.
pub const MAX_RESULTS: u64 = 10;

/// Searches the local game catalog by title. A numeric title is first tried as a Steam
/// app id.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameSearch;

#[async_trait]
impl CommandHandler for GameSearch {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let title = ctx.string_option("title").unwrap_or_default().trim();
        if title.is_empty() {
            return ctx.say_private("❌ Please provide a game title to search for.").await;
        }

        // Catalog queries can be slow on a cold database
        ctx.defer().await?;

        let db = &ctx.data().database;
        let mut games: Vec<GameModel> = match title.parse::<i64>() {
            Ok(steam_id) => game::get_game_by_steam_id(db, steam_id)
                .await?
                .into_iter()
                .collect(),
            Err(_) => Vec::new(),
        };
        // Numeric titles like "1942" fall back to a name search
        if games.is_empty() {
            games = game::search_games(db, title, MAX_RESULTS).await?;
        }

        ctx.say(format_results(title, &games)).await
    }
}

/// Renders search results for Discord.
#[must_use]
pub fn format_results(title: &str, games: &[GameModel]) -> String {
    if games.is_empty() {
        return format!("No games found matching **{title}**.");
    }

    let mut message = format!("Games matching **{title}**:");
    for game in games {
        let _ = write!(
            message,
            "\n• {} (<https://store.steampowered.com/app/{}>)",
            game.name, game.steam_id
        );
    }
    message
}
