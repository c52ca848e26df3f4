use dotenvy::dotenv;
use lobby_locator::{
    bot::{self, BotData, commands, publisher, registry},
    config::{AppConfig, database},
    core::{game, steam},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env file first so RUST_LOG from it applies to tracing
    let dotenv_result = dotenv();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => info!("No .env file loaded ({e}), using process environment"),
    }

    // 3. Load configuration
    let config = AppConfig::from_env()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = database::create_connection(&config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Import new apps from the Steam catalog, then keep refreshing in the background
    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    steam::sync_catalog(&db, &http_client, &config.steam_app_list_url).await;
    match game::count_games(&db).await {
        Ok(count) => info!("Game catalog holds {count} game(s)"),
        Err(e) => warn!("Could not count games: {e}"),
    }
    let _catalog_refresh = tokio::spawn(steam::refresh_catalog_periodically(
        db.clone(),
        http_client,
        config.steam_app_list_url.clone(),
        steam::CATALOG_REFRESH_INTERVAL,
    ));

    // 6. Load command modules and publish them
    let registry =
        registry::load_commands(&config.commands_dir, &commands::builtin_handlers()).await;
    let sync = publisher::DiscordCommandSync::new(&config.discord_token, config.application_id);
    publisher::publish_commands(&registry, &sync).await;

    // 7. Run the bot
    let data = Arc::new(BotData::new(registry, db));
    bot::run_bot(&config.discord_token, data).await
}
