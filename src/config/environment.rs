//! Application settings loaded from environment variables.
//!
//! `main` loads a `.env` file with `dotenvy` before calling [`AppConfig::from_env`], so
//! every value here can come either from the process environment or from that file.

use crate::errors::{Error, Result};
use std::path::PathBuf;

/// Default `SQLite` database location, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/lobby_locator.sqlite?mode=rwc";

/// Default directory scanned for command definition files.
pub const DEFAULT_COMMANDS_DIR: &str = "commands";

/// Steam endpoint returning every publicly listed app.
pub const DEFAULT_STEAM_APP_LIST_URL: &str =
    "https://api.steampowered.com/ISteamApps/GetAppList/v0002";

/// Process-wide configuration, built once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Bot token used for both command publishing and gateway login
    pub discord_token: String,
    /// Application whose global commands are replaced on startup
    pub application_id: u64,
    /// `SeaORM` connection string
    pub database_url: String,
    /// Directory holding the `*.toml` command definitions
    pub commands_dir: PathBuf,
    /// Steam app list endpoint
    pub steam_app_list_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("discord_token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("database_url", &self.database_url)
            .field("commands_dir", &self.commands_dir)
            .field("steam_app_list_url", &self.steam_app_list_url)
            .finish()
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `DISCORD_BOT_TOKEN` or `DISCORD_APPLICATION_ID` is
    /// missing, or if the application id is not a non-zero integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_token = get("DISCORD_BOT_TOKEN").ok_or_else(|| Error::Config {
            message: "DISCORD_BOT_TOKEN is not set".to_string(),
        })?;

        let raw_application_id = get("DISCORD_APPLICATION_ID").ok_or_else(|| Error::Config {
            message: "DISCORD_APPLICATION_ID is not set".to_string(),
        })?;
        let application_id = raw_application_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::Config {
                message: format!(
                    "DISCORD_APPLICATION_ID must be a non-zero integer, got '{raw_application_id}'"
                ),
            })?;

        Ok(Self {
            discord_token,
            application_id,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            commands_dir: get("COMMANDS_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_COMMANDS_DIR), PathBuf::from),
            steam_app_list_url: get("STEAM_APP_LIST_URL")
                .unwrap_or_else(|| DEFAULT_STEAM_APP_LIST_URL.to_string()),
        })
    }
}
