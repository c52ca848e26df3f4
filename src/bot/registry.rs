//! Command registry - discovers command modules on disk and maps them by name.
//!
//! A command file is a TOML document pairing a wire definition with the name of a
//! compiled-in handler:
//!
//! ```toml
//! execute = "ping"
//!
//! [data]
//! name = "ping"
//! description = "Check that the bot is alive"
//! ```
//!
//! A file only becomes a [`CommandModule`] when it has the `.toml` extension, parses,
//! carries both `data` and `execute`, passes definition validation, and `execute` names
//! a handler in the [`HandlerCatalog`]. Anything else is logged and skipped.

use crate::{
    bot::{context::CommandHandler, definition::CommandDefinition},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, instrument, warn};

/// Extension a file must have to be considered a command file.
pub const COMMAND_FILE_EXTENSION: &str = "toml";

/// A loaded command: its definition plus the handler that runs it.
#[derive(Clone)]
pub struct CommandModule {
    /// Wire definition published to Discord
    pub definition: CommandDefinition,
    /// Handler invoked when the command is used
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandModule {
    /// Pairs a definition with its handler.
    #[must_use]
    pub fn new(definition: CommandDefinition, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            definition,
            handler,
        }
    }

    /// Registry key of this module.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl fmt::Debug for CommandModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandModule")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Handlers compiled into the binary, looked up by the `execute` key of command files.
#[derive(Default, Clone)]
pub struct HandlerCatalog {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl HandlerCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `key`, replacing any handler with the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(key.into(), Arc::new(handler));
        self
    }

    /// Looks up a handler by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(key).cloned()
    }

    /// Number of handlers in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the catalog has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Read-only name to module mapping, built once at startup.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandModule>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `module` keyed by its name, returning the module it replaced.
    pub fn insert(&mut self, module: CommandModule) -> Option<CommandModule> {
        self.commands.insert(module.name().to_string(), module)
    }

    /// Looks up a command by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandModule> {
        self.commands.get(name)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All definitions, sorted by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        let mut definitions: Vec<CommandDefinition> = self
            .commands
            .values()
            .map(|module| module.definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

impl FromIterator<CommandModule> for CommandRegistry {
    fn from_iter<I: IntoIterator<Item = CommandModule>>(iter: I) -> Self {
        let mut registry = Self::new();
        for module in iter {
            registry.insert(module);
        }
        registry
    }
}

/// On-disk shape of a command file. Both members are optional here so a missing one
/// can be reported by name.
#[derive(Deserialize)]
struct CommandFile {
    data: Option<CommandDefinition>,
    execute: Option<String>,
}

fn malformed(path: &Path, reason: impl Into<String>) -> Error {
    let file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Error::MalformedCommand {
        file,
        reason: reason.into(),
    }
}

/// Turns the contents of one command file into a module.
///
/// # Errors
/// Returns [`Error::MalformedCommand`] describing why the file was rejected.
pub fn parse_command_file(
    path: &Path,
    contents: &str,
    catalog: &HandlerCatalog,
) -> Result<CommandModule> {
    let file: CommandFile =
        toml::from_str(contents).map_err(|e| malformed(path, e.message().to_string()))?;

    let definition = file.data.ok_or_else(|| malformed(path, "missing `data` table"))?;
    let handler_key = file
        .execute
        .ok_or_else(|| malformed(path, "missing `execute` handler"))?;

    definition.validate().map_err(|reason| malformed(path, reason))?;

    let handler = catalog
        .get(&handler_key)
        .ok_or_else(|| malformed(path, format!("unknown handler `{handler_key}`")))?;

    Ok(CommandModule::new(definition, handler))
}

/// Reads and parses one command file.
///
/// # Errors
/// Returns [`Error::MalformedCommand`] if the file has the wrong extension, cannot be
/// read, or does not describe a valid command module.
pub async fn load_command_file(path: &Path, catalog: &HandlerCatalog) -> Result<CommandModule> {
    let is_command_file = path
        .extension()
        .is_some_and(|ext| ext == COMMAND_FILE_EXTENSION);
    if !is_command_file {
        return Err(malformed(path, "not a .toml file"));
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| malformed(path, e.to_string()))?;

    parse_command_file(path, &contents, catalog)
}

/// Lists the files in `dir`, sorted by path.
///
/// Only a failure to read the directory itself is an error. Entries whose metadata cannot
/// be read, such as dangling symlinks, are logged and skipped.
async fn list_command_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {
                debug!("Skipping directory {}", path.display());
            }
            Ok(_) => files.push(path),
            Err(e) => warn!("Skipping unreadable entry {}: {e}", path.display()),
        }
    }

    files.sort();
    Ok(files)
}

/// Loads every command module in `dir`.
///
/// Files are processed in file-name order. Malformed files are logged and skipped. When
/// two files define the same command name the later file wins. If the directory cannot
/// be listed at all, the problem is logged and an empty registry is returned.
#[instrument(skip(catalog))]
pub async fn load_commands(dir: &Path, catalog: &HandlerCatalog) -> CommandRegistry {
    let files = match list_command_files(dir).await {
        Ok(files) => files,
        Err(e) => {
            warn!("Could not read command directory {}: {e}", dir.display());
            return CommandRegistry::new();
        }
    };

    let mut registry = CommandRegistry::new();
    for path in files {
        match load_command_file(&path, catalog).await {
            Ok(module) => {
                let name = module.name().to_string();
                if registry.insert(module).is_some() {
                    warn!(
                        "Command `{name}` from {} replaces an earlier definition",
                        path.display()
                    );
                } else {
                    debug!("Loaded command `{name}` from {}", path.display());
                }
            }
            Err(e) => warn!("{e}"),
        }
    }

    info!("Loaded {} command(s)", registry.len());
    registry
}
