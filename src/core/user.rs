//! Steam account linking for Discord users.
//!
//! Each Discord user can link at most one Steam account, and each Steam account can be
//! linked to at most one Discord user. Steam ids are accepted either as a bare 64-bit id
//! or as a `steamcommunity.com/profiles/<id>` URL. Custom (`/id/<name>`) profile URLs
//! need the Steam Web API to resolve and are rejected.

use crate::{
    entities::{User, UserActiveModel, UserColumn},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::{debug, info};

/// Lowest 64-bit id of an individual Steam account (account number zero).
const STEAM_ID64_BASE: i64 = 76_561_197_960_265_728;

/// Number of individual account ids above [`STEAM_ID64_BASE`].
const STEAM_ACCOUNT_SPACE: i64 = 1 << 32;

const PROFILE_URL_PREFIXES: [&str; 2] = [
    "https://steamcommunity.com/profiles/",
    "http://steamcommunity.com/profiles/",
];

/// Result of linking a Steam account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The Steam id is now linked, replacing any previous link of this user
    Linked,
    /// This user already had exactly this Steam id linked
    Unchanged,
    /// Another Discord user has already linked this Steam id
    TakenByAnotherUser,
}

/// Extracts a 64-bit Steam id from a bare id or a `/profiles/` URL.
///
/// Returns `None` when the input is neither, or when the number is outside the range of
/// individual Steam accounts.
#[must_use]
pub fn parse_steam_id(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let candidate = PROFILE_URL_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);

    if candidate.len() != 17 || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let steam_id: i64 = candidate.parse().ok()?;
    let account = steam_id - STEAM_ID64_BASE;
    (account > 0 && account < STEAM_ACCOUNT_SPACE).then_some(steam_id)
}

fn discord_key(discord_id: u64) -> Result<i64> {
    i64::try_from(discord_id).map_err(|_| Error::Command {
        message: format!("Discord id {discord_id} is out of range"),
    })
}

/// Returns the Steam id linked to `discord_id`, if any.
pub async fn get_steam_id(db: &DatabaseConnection, discord_id: u64) -> Result<Option<i64>> {
    let user = User::find_by_id(discord_key(discord_id)?).one(db).await?;
    Ok(user.map(|user| user.steam_id))
}

/// Links `steam_id` to `discord_id`, replacing the user's previous link.
///
/// # Errors
/// Returns an error if `discord_id` does not fit the database column or a query fails.
pub async fn set_steam_id(
    db: &DatabaseConnection,
    discord_id: u64,
    steam_id: i64,
) -> Result<LinkOutcome> {
    let key = discord_key(discord_id)?;

    let owner = User::find()
        .filter(UserColumn::SteamId.eq(steam_id))
        .one(db)
        .await?;
    if let Some(owner) = owner {
        return Ok(if owner.discord_id == key {
            LinkOutcome::Unchanged
        } else {
            debug!("Steam id {steam_id} is already linked to another user");
            LinkOutcome::TakenByAnotherUser
        });
    }

    let user = UserActiveModel {
        discord_id: Set(key),
        steam_id: Set(steam_id),
    };
    User::insert(user)
        .on_conflict(
            OnConflict::column(UserColumn::DiscordId)
                .update_column(UserColumn::SteamId)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!("Linked Discord user {discord_id} to Steam id {steam_id}");
    Ok(LinkOutcome::Linked)
}

/// Removes the Steam link of `discord_id`. Returns whether a link existed.
pub async fn remove_user(db: &DatabaseConnection, discord_id: u64) -> Result<bool> {
    let result = User::delete_by_id(discord_key(discord_id)?).exec(db).await?;
    Ok(result.rows_affected > 0)
}
