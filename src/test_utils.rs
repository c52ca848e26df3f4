//! Shared test utilities for Lobby Locator.
//!
//! Helpers for in-memory databases, recording fakes for the Discord seams, and a
//! one-shot HTTP stub for the Steam client.

#![allow(clippy::expect_used)]

use crate::{
    bot::{
        BotData,
        context::{CommandContext, CommandHandler, InteractionResponder, Reply},
        definition::CommandDefinition,
        publisher::CommandSync,
        registry::{CommandModule, CommandRegistry},
    },
    entities::{Game, GameActiveModel},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts `(steam_id, name)` pairs into the `games` table.
pub async fn seed_games(db: &DatabaseConnection, games: &[(i64, &str)]) -> Result<()> {
    let rows = games.iter().map(|(steam_id, name)| GameActiveModel {
        steam_id: Set(*steam_id),
        name: Set((*name).to_string()),
    });
    Game::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Builds bot data with the given commands and a fresh in-memory database.
pub async fn setup_test_data(modules: Vec<CommandModule>) -> Result<BotData> {
    let registry: CommandRegistry = modules.into_iter().collect();
    Ok(BotData::new(registry, setup_test_db().await?))
}

/// Creates a command module named `name` with description "The {name} command".
pub fn test_module(name: &str, handler: impl CommandHandler + 'static) -> CommandModule {
    let definition = CommandDefinition {
        name: name.to_string(),
        description: format!("The {name} command"),
        kind: 1,
        options: Vec::new(),
    };
    CommandModule::new(definition, Arc::new(handler))
}

/// Writes `contents` to `dir/name` and returns the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

/// Handler that succeeds without responding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

#[async_trait]
impl CommandHandler for NoopHandler {
    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Shared invocation counter.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Current count.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a [`FailingHandler`] does before returning its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStep {
    /// Sends a public "working on it" reply
    Reply,
    /// Defers the response
    Defer,
}

/// Handler that always fails, optionally after answering the interaction.
#[derive(Debug, Clone, Default)]
pub struct FailingHandler {
    step: Option<FailureStep>,
    calls: CallCounter,
}

impl FailingHandler {
    /// Fails before touching the interaction.
    pub fn immediately() -> Self {
        Self::default()
    }

    /// Performs `step`, then fails.
    pub fn after(step: FailureStep) -> Self {
        Self {
            step: Some(step),
            calls: CallCounter::default(),
        }
    }

    /// Counter of how many times the handler ran.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        self.calls.increment();
        match self.step {
            Some(FailureStep::Reply) => ctx.say("working on it").await?,
            Some(FailureStep::Defer) => ctx.defer().await?,
            None => {}
        }
        Err(Error::Command {
            message: "handler exploded".to_string(),
        })
    }
}

/// Handler that panics, optionally after deferring.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingHandler {
    defer_first: bool,
}

impl PanickingHandler {
    /// Panics before touching the interaction.
    pub fn immediately() -> Self {
        Self::default()
    }

    /// Defers the response, then panics.
    pub fn after_defer() -> Self {
        Self { defer_first: true }
    }
}

#[async_trait]
impl CommandHandler for PanickingHandler {
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        if self.defer_first {
            ctx.defer().await?;
        }
        let empty: Vec<u8> = Vec::new();
        let index = ctx.invocation().options.len() + 3;
        Err(Error::Command {
            message: format!("unreachable {}", empty[index]),
        })
    }
}

/// One call observed by a [`RecordingResponder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    /// Initial response
    Reply(Reply),
    /// Deferral
    Defer {
        /// Whether the deferral was private
        ephemeral: bool,
    },
    /// Follow-up message
    FollowUp(Reply),
}

/// Responder that records every call, optionally failing all of them.
#[derive(Debug, Default)]
pub struct RecordingResponder {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingResponder {
    /// Responder whose every call fails after being recorded.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Calls observed so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, sent: Sent) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sent);
        if self.fail {
            return Err(Error::Command {
                message: "Unknown interaction".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn reply(&self, reply: Reply) -> Result<()> {
        self.record(Sent::Reply(reply))
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        self.record(Sent::Defer { ephemeral })
    }

    async fn follow_up(&self, reply: Reply) -> Result<()> {
        self.record(Sent::FollowUp(reply))
    }
}

/// Command sync that records each payload, optionally failing with a fixed message.
#[derive(Debug, Default)]
pub struct RecordingSync {
    calls: Mutex<Vec<Vec<CommandDefinition>>>,
    failure: Option<String>,
}

impl RecordingSync {
    /// Sync whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    /// Payloads received so far.
    pub fn calls(&self) -> Vec<Vec<CommandDefinition>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandSync for RecordingSync {
    async fn replace_global_commands(&self, commands: &[CommandDefinition]) -> Result<usize> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(commands.to_vec());
        match &self.failure {
            Some(message) => Err(Error::Command {
                message: message.clone(),
            }),
            None => Ok(commands.len()),
        }
    }
}

/// Serves a single HTTP response on a local port and returns the URL to request.
pub async fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0_u8; 4096];
            let _ = stream.read(&mut request).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}/ISteamApps/GetAppList/v0002")
}
