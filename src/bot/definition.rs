//! Slash command definitions in Discord's wire schema.
//!
//! Definitions are authored as TOML (`[data]` table of a command file) and serialized to
//! the JSON body Discord expects when global commands are replaced. Option types are
//! written by name in TOML (`type = "string"`) and sent as their numeric ids.

use serde::{Deserialize, Serialize, Serializer};

/// Application command type for slash commands.
const CHAT_INPUT: u8 = 1;

/// Longest name Discord accepts for commands and options.
const MAX_NAME_LEN: usize = 32;

/// Longest description Discord accepts for commands and options.
const MAX_DESCRIPTION_LEN: usize = 100;

/// Most options a single command may declare.
const MAX_OPTIONS: usize = 25;

/// A slash command as published to Discord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Command name users type after the slash; also the registry key
    pub name: String,
    /// Short help text shown in the Discord client
    pub description: String,
    /// Discord application command type, always chat input for loaded commands
    #[serde(rename = "type", default = "chat_input")]
    pub kind: u8,
    /// Parameters the command accepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionDefinition>,
}

const fn chat_input() -> u8 {
    CHAT_INPUT
}

/// One parameter of a slash command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionDefinition {
    /// Value type of the option
    #[serde(rename = "type")]
    pub kind: OptionKind,
    /// Option name
    pub name: String,
    /// Help text for the option
    pub description: String,
    /// Whether users must provide the option
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Fixed set of values users pick from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    /// Lower bound for integer and number options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Upper bound for integer and number options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Minimum length for string options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    /// Maximum length for string options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    /// Parameters of a subcommand
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionDefinition>,
}

/// A predefined choice for an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    /// Label shown to users
    pub name: String,
    /// Value delivered to the handler
    pub value: ChoiceValue,
}

/// Value carried by an [`OptionChoice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// Integer choice
    Integer(i64),
    /// Floating point choice
    Number(f64),
    /// String choice
    String(String),
}

/// Option value types supported in command files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// A subcommand with its own options
    SubCommand,
    /// Free text
    String,
    /// Whole number
    Integer,
    /// True or false
    Boolean,
    /// A Discord user
    User,
    /// A guild channel
    Channel,
    /// A guild role
    Role,
    /// Floating point number
    Number,
}

impl OptionKind {
    /// Discord's numeric id for this option type.
    #[must_use]
    pub const fn wire_id(self) -> u8 {
        match self {
            Self::SubCommand => 1,
            Self::String => 3,
            Self::Integer => 4,
            Self::Boolean => 5,
            Self::User => 6,
            Self::Channel => 7,
            Self::Role => 8,
            Self::Number => 10,
        }
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.wire_id())
    }
}

fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
        && name.chars().all(|c| {
            c == '-' || c == '_' || c.is_numeric() || (c.is_alphabetic() && !c.is_uppercase())
        })
}

fn is_valid_description(description: &str) -> bool {
    let len = description.chars().count();
    (1..=MAX_DESCRIPTION_LEN).contains(&len)
}

impl CommandDefinition {
    /// Checks the definition against Discord's naming and size limits.
    ///
    /// Returns a human readable reason for the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.kind != CHAT_INPUT {
            return Err(format!("unsupported command type {}", self.kind));
        }
        if !is_valid_name(&self.name) {
            return Err(format!(
                "invalid command name '{}': use 1-{MAX_NAME_LEN} lowercase letters, digits, '-' or '_'",
                self.name
            ));
        }
        if !is_valid_description(&self.description) {
            return Err(format!(
                "description must be 1-{MAX_DESCRIPTION_LEN} characters"
            ));
        }
        validate_options(&self.options, true)
    }
}

/// Validates one level of options. Subcommands are only allowed at the top level, and a
/// level holding subcommands may hold nothing else.
fn validate_options(options: &[CommandOptionDefinition], top_level: bool) -> Result<(), String> {
    if options.len() > MAX_OPTIONS {
        return Err(format!("at most {MAX_OPTIONS} options are allowed"));
    }

    let subcommands = options
        .iter()
        .filter(|option| option.kind == OptionKind::SubCommand)
        .count();
    if subcommands > 0 && !top_level {
        return Err("subcommands cannot be nested".to_string());
    }
    if subcommands > 0 && subcommands < options.len() {
        return Err("subcommands cannot be mixed with other options".to_string());
    }

    let mut seen_optional = false;
    for option in options {
        if !is_valid_name(&option.name) {
            return Err(format!("invalid option name '{}'", option.name));
        }
        if !is_valid_description(&option.description) {
            return Err(format!(
                "option '{}' description must be 1-{MAX_DESCRIPTION_LEN} characters",
                option.name
            ));
        }

        if option.kind == OptionKind::SubCommand {
            if option.required {
                return Err(format!("subcommand '{}' cannot be required", option.name));
            }
            validate_options(&option.options, false)
                .map_err(|reason| format!("subcommand '{}': {reason}", option.name))?;
            continue;
        }
        if !option.options.is_empty() {
            return Err(format!("option '{}' cannot have nested options", option.name));
        }

        // Discord rejects required options listed after optional ones
        if option.required && seen_optional {
            return Err(format!(
                "required option '{}' must come before optional options",
                option.name
            ));
        }
        seen_optional |= !option.required;
    }

    Ok(())
}
