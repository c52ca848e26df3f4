//! Game catalog queries.
//!
//! Read-only lookups over the `games` table populated by the Steam sync.

use crate::{
    entities::{Game, GameColumn, GameModel},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};

/// Escape character used in `LIKE` patterns built by [`contains_pattern`].
const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE` pattern matching `text` anywhere, with `%` and `_` taken literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Finds games whose name contains `title`, ordered by name.
///
/// Matching is case-insensitive for ASCII names (`SQLite` `LIKE` semantics) and treats
/// every character of `title` literally. At most `limit` games are returned.
///
/// # Errors
/// Returns an error if `title` is empty or whitespace-only, or if the query fails.
pub async fn search_games(
    db: &DatabaseConnection,
    title: &str,
    limit: u64,
) -> Result<Vec<GameModel>> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Command {
            message: "Game title cannot be empty".to_string(),
        });
    }

    Game::find()
        .filter(
            Expr::col((Game, GameColumn::Name))
                .like(LikeExpr::new(contains_pattern(title)).escape(LIKE_ESCAPE)),
        )
        .order_by_asc(GameColumn::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a game by its Steam app id.
pub async fn get_game_by_steam_id(
    db: &DatabaseConnection,
    steam_id: i64,
) -> Result<Option<GameModel>> {
    Game::find_by_id(steam_id).one(db).await.map_err(Into::into)
}

/// Number of games in the catalog.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    Game::find().count(db).await.map_err(Into::into)
}
