//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control sessions and configuration without sending
//! messages to the model.

use crate::chat::prompt::{Persona, ResponseLength, ResponseStyle};
use crate::types::Feedback;

/// Quick-prompt presets that prefill the query input.
pub const PRESETS: &[(&str, &str)] = &[
    ("explain", "Explain this concept in simple terms: "),
    ("summarize", "Summarize the following text: "),
    ("brainstorm", "Brainstorm five ideas for "),
    ("debug", "Help me debug this error message: "),
    ("translate", "Translate the following into English: "),
];

/// Looks up a preset snippet by name.
pub fn preset(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, snippet)| *snippet)
}

/// A parsed chat command.
///
/// These commands control the session and are not sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Create a new session and make it active.
    NewSession,

    /// List all sessions.
    Sessions,

    /// Switch to a session by id.
    Switch(u64),

    /// Rename a session.
    Rename(u64, String),

    /// Delete a session by id.
    Delete(u64),

    /// Change the model.
    Model(String),

    /// List the model catalog.
    Models,

    /// Set the sampling temperature.
    Temperature(f32),

    /// Set the response style.
    Style(ResponseStyle),

    /// Set the response length.
    Length(ResponseLength),

    /// Set the assistant persona.
    Persona(Persona),

    /// Set or clear the base system prompt.
    /// `None` restores the default system prompt.
    System(Option<String>),

    /// Prefill the input with a quick-prompt preset.
    Preset(String),

    /// List the quick-prompt presets.
    Presets,

    /// Rate the latest response.
    Rate(Feedback),

    /// Export the active session transcript.
    /// `None` writes to the default file name.
    Export(Option<String>),

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use banter::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/switch 2").is_some());
/// assert!(parse_command("What is a monad?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::NewSession,
        "sessions" => ChatCommand::Sessions,
        "switch" => parse_id_command(argument, ChatCommand::Switch, "/switch"),
        "rename" => parse_rename_command(argument),
        "delete" => parse_id_command(argument, ChatCommand::Delete, "/delete"),
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "models" => ChatCommand::Models,
        "temperature" => match argument {
            Some(arg) => match parse_f32_in_range(arg, 0.0, 1.0) {
                Ok(value) => ChatCommand::Temperature(value),
                Err(err) => ChatCommand::Invalid(format!("/temperature {err}")),
            },
            None => ChatCommand::Invalid("/temperature requires a value".to_string()),
        },
        "style" => parse_choice_command(argument, ChatCommand::Style, "/style"),
        "length" => parse_choice_command(argument, ChatCommand::Length, "/length"),
        "persona" => parse_choice_command(argument, ChatCommand::Persona, "/persona"),
        "system" => ChatCommand::System(argument.map(|s| s.to_string())),
        "preset" => match argument {
            Some(name) => ChatCommand::Preset(name.to_string()),
            None => ChatCommand::Invalid("/preset requires a preset name".to_string()),
        },
        "presets" => ChatCommand::Presets,
        "rate" => parse_choice_command(argument, ChatCommand::Rate, "/rate"),
        "export" => ChatCommand::Export(argument.map(|s| s.to_string())),
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_rename_command(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/rename requires an id and a name".to_string());
    };
    let mut parts = arg.splitn(2, ' ');
    let id = parts.next().unwrap();
    let Ok(id) = id.parse::<u64>() else {
        return ChatCommand::Invalid("/rename expects a numeric session id".to_string());
    };
    // The rest of the line is the name, verbatim; blank names are allowed.
    let name = parts.next().unwrap_or("").to_string();
    ChatCommand::Rename(id, name)
}

fn parse_id_command<F>(argument: Option<&str>, constructor: F, name: &str) -> ChatCommand
where
    F: Fn(u64) -> ChatCommand,
{
    match argument {
        Some(arg) => match arg.parse::<u64>() {
            Ok(value) => constructor(value),
            Err(_) => ChatCommand::Invalid(format!("{} expects a numeric session id", name)),
        },
        None => ChatCommand::Invalid(format!("{} requires a session id", name)),
    }
}

fn parse_choice_command<T, F>(argument: Option<&str>, constructor: F, name: &str) -> ChatCommand
where
    T: std::str::FromStr<Err = String>,
    F: Fn(T) -> ChatCommand,
{
    match argument {
        Some(arg) => match arg.parse::<T>() {
            Ok(value) => constructor(value),
            Err(err) => ChatCommand::Invalid(format!("{name} {err}")),
        },
        None => ChatCommand::Invalid(format!("{name} requires a value")),
    }
}

fn parse_f32_in_range(value: &str, min: f32, max: f32) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("expects a value between {min} and {max}"))?;
    if parsed.is_finite() && parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects a value between {min} and {max}"))
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Create a new session and switch to it
  /sessions              List all sessions
  /switch <id>           Switch to a session
  /rename <id> <name>    Rename a session
  /delete <id>           Delete a session
  /model <name>          Change the model (e.g., /model deepseek-r1:1.5b)
  /models                List the model catalog
  /temperature <v>       Set temperature 0.0-1.0
  /style <choice>        Set tone: balanced, formal, casual, technical
  /length <choice>       Set verbosity: balanced, concise, detailed
  /persona <choice>      Set persona: assistant, tutor, engineer, storyteller
  /system [prompt]       Set base system prompt (no argument restores default)
  /preset <name>         Prefill the input with a quick prompt
  /presets               List quick-prompt presets
  /rate good|neutral|bad Rate the latest response
  /export [file]         Export the transcript (default: chat_log.txt)
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_session_commands() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::NewSession));
        assert_eq!(parse_command("/sessions"), Some(ChatCommand::Sessions));
        assert_eq!(parse_command("/switch 2"), Some(ChatCommand::Switch(2)));
        assert_eq!(parse_command("/delete 3"), Some(ChatCommand::Delete(3)));
        assert!(matches!(
            parse_command("/switch two"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("numeric")
        ));
        assert!(matches!(
            parse_command("/delete"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_rename() {
        assert_eq!(
            parse_command("/rename 2 weekend project"),
            Some(ChatCommand::Rename(2, "weekend project".to_string()))
        );
        // Blank names are allowed; the store is permissive.
        assert_eq!(
            parse_command("/rename 2"),
            Some(ChatCommand::Rename(2, "".to_string()))
        );
        assert!(matches!(
            parse_command("/rename two notes"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("numeric")
        ));
    }

    #[test]
    fn parse_model() {
        assert_eq!(
            parse_command("/model deepseek-r1:1.5b"),
            Some(ChatCommand::Model("deepseek-r1:1.5b".to_string()))
        );
        assert_eq!(parse_command("/models"), Some(ChatCommand::Models));
        assert!(matches!(
            parse_command("/model"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_temperature() {
        assert_eq!(
            parse_command("/temperature 0.5"),
            Some(ChatCommand::Temperature(0.5))
        );
        assert!(matches!(
            parse_command("/temperature 1.5"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("between")
        ));
        assert!(matches!(
            parse_command("/temperature"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_directive_choices() {
        assert_eq!(
            parse_command("/style technical"),
            Some(ChatCommand::Style(crate::chat::ResponseStyle::Technical))
        );
        assert_eq!(
            parse_command("/length concise"),
            Some(ChatCommand::Length(crate::chat::ResponseLength::Concise))
        );
        assert_eq!(
            parse_command("/persona tutor"),
            Some(ChatCommand::Persona(crate::chat::Persona::Tutor))
        );
        assert!(matches!(
            parse_command("/style sarcastic"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("unrecognized")
        ));
    }

    #[test]
    fn parse_system() {
        assert_eq!(
            parse_command("/system You are a pirate"),
            Some(ChatCommand::System(Some("You are a pirate".to_string())))
        );
        assert_eq!(parse_command("/system"), Some(ChatCommand::System(None)));
    }

    #[test]
    fn parse_rate() {
        assert_eq!(
            parse_command("/rate good"),
            Some(ChatCommand::Rate(Feedback::Good))
        );
        assert_eq!(
            parse_command("/rate BAD"),
            Some(ChatCommand::Rate(Feedback::Bad))
        );
        assert!(matches!(
            parse_command("/rate great"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("unrecognized")
        ));
    }

    #[test]
    fn parse_preset_and_export() {
        assert_eq!(
            parse_command("/preset explain"),
            Some(ChatCommand::Preset("explain".to_string()))
        );
        assert_eq!(parse_command("/presets"), Some(ChatCommand::Presets));
        assert_eq!(parse_command("/export"), Some(ChatCommand::Export(None)));
        assert_eq!(
            parse_command("/export notes.txt"),
            Some(ChatCommand::Export(Some("notes.txt".to_string())))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("What is a monad?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn preset_lookup() {
        assert_eq!(preset("explain"), Some("Explain this concept in simple terms: "));
        assert_eq!(preset("missing"), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(!help.is_empty());
        assert!(help.contains("/quit"));
        assert!(help.contains("/sessions"));
        assert!(help.contains("/rate"));
        assert!(help.contains("/export"));
    }
}
