//! Steam catalog sync - fetches the full Steam app list and imports new games.
//!
//! The fetch is fail-soft: any network, status, or parse problem yields an empty list so
//! startup carries on with whatever is already in the database. The import is
//! insert-if-absent keyed by the Steam app id, so re-running it at startup and on every
//! periodic refresh only adds apps that were published since the last run.

use crate::{
    entities::{Game, GameActiveModel, GameColumn},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait, sea_query::OnConflict};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// How often the catalog is re-imported after the startup sync.
pub const CATALOG_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Rows per `INSERT` statement. Two bound parameters per row keeps every statement under
/// `SQLite`'s historical 999-parameter limit.
const INSERT_CHUNK_SIZE: usize = 400;

/// One entry of the Steam catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SteamApp {
    /// Steam app id, for example 730
    pub appid: i64,
    /// App name, for example "Counter-Strike 2"
    pub name: String,
}

impl From<&SteamApp> for GameActiveModel {
    fn from(app: &SteamApp) -> Self {
        Self {
            steam_id: Set(app.appid),
            name: Set(app.name.clone()),
        }
    }
}

#[derive(Deserialize)]
struct AppListResponse {
    applist: AppList,
}

#[derive(Deserialize)]
struct AppList {
    apps: Vec<SteamApp>,
}

/// Parses a `GetAppList` response body.
///
/// # Errors
/// Returns an error if the body is not JSON of the form
/// `{ "applist": { "apps": [ { "appid": .., "name": .. } ] } }`.
pub fn parse_app_list(body: &str) -> Result<Vec<SteamApp>> {
    let response: AppListResponse = serde_json::from_str(body)?;
    Ok(response.applist.apps)
}

async fn try_fetch_app_list(client: &reqwest::Client, url: &str) -> Result<Vec<SteamApp>> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    parse_app_list(&body)
}

/// Fetches every app publicly listed on Steam.
///
/// Never fails: on any error the problem is logged and an empty list is returned.
#[instrument(skip(client))]
pub async fn fetch_app_list(client: &reqwest::Client, url: &str) -> Vec<SteamApp> {
    match try_fetch_app_list(client, url).await {
        Ok(apps) => {
            info!("Fetched {} apps from the Steam API", apps.len());
            apps
        }
        Err(e) => {
            warn!("Could not fetch the Steam app list: {e}");
            Vec::new()
        }
    }
}

/// Inserts `apps` into the `games` table, skipping any whose Steam id is already stored.
///
/// An empty slice returns immediately without touching the database. Returns the number
/// of rows actually inserted.
///
/// # Errors
/// Returns an error if any insert statement or the surrounding transaction fails. Nothing
/// from the failed call is committed.
pub async fn insert_apps(db: &DatabaseConnection, apps: &[SteamApp]) -> Result<u64> {
    if apps.is_empty() {
        debug!("No apps supplied, skipping insert");
        return Ok(0);
    }

    let txn = db.begin().await?;
    let mut inserted = 0;

    for chunk in apps.chunks(INSERT_CHUNK_SIZE) {
        inserted += Game::insert_many(chunk.iter().map(GameActiveModel::from))
            .on_conflict(OnConflict::column(GameColumn::SteamId).do_nothing().to_owned())
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(inserted)
}

/// Runs one full catalog sync: fetch, then import.
///
/// An empty fetch result keeps the existing data and skips the import. Import failures
/// are logged and do not propagate. Returns the number of newly inserted games.
#[instrument(skip(db, client))]
pub async fn sync_catalog(db: &DatabaseConnection, client: &reqwest::Client, url: &str) -> u64 {
    let apps = fetch_app_list(client, url).await;

    if apps.is_empty() {
        info!("Steam app list is empty, using existing game data");
        return 0;
    }

    match insert_apps(db, &apps).await {
        Ok(inserted) => {
            info!("Inserted {inserted} new app(s) into the database");
            inserted
        }
        Err(e) => {
            warn!("Could not insert apps into the database: {e}");
            0
        }
    }
}

/// Runs [`sync_catalog`] once every `period`, the first time one `period` from now.
///
/// Never returns; spawn it as a background task after the startup sync.
pub async fn refresh_catalog_periodically(
    db: DatabaseConnection,
    client: reqwest::Client,
    url: String,
    period: Duration,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        info!("Refreshing Steam catalog");
        sync_catalog(&db, &client, &url).await;
    }
}
