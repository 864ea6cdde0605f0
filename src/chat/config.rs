//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

use crate::chat::prompt::{Directive, Persona, ResponseLength, ResponseStyle};
use crate::types::{KnownModel, Model};

/// Default base URL of the local completion runtime.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default base system prompt.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and informative AI assistant.";

/// Command-line arguments for the banter-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: deepseek-r1:1.5b)", "MODEL")]
    pub model: Option<String>,

    /// Base URL of the completion runtime.
    #[arrrg(optional, "Runtime endpoint (default: http://localhost:11434)", "URL")]
    pub endpoint: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Temperature 0.0-1.0 (default: 0.3)", "TEMP")]
    pub temperature: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "Base system prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for the chat application.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults. It is read by the
/// prompt assembler and the client cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Base URL of the completion runtime.
    pub base_url: String,

    /// Sampling temperature in [0.0, 1.0].
    pub temperature: f32,

    /// Base system prompt the directive choices are appended to.
    pub system_prompt: String,

    /// Response tone choice.
    pub style: ResponseStyle,

    /// Response verbosity choice.
    pub length: ResponseLength,

    /// Assistant persona choice.
    pub persona: Persona,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: deepseek-r1:1.5b
    /// - Endpoint: http://localhost:11434
    /// - Temperature: 0.3
    /// - Directive choices: balanced/balanced/assistant
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::DeepseekR1Tiny),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            style: ResponseStyle::default(),
            length: ResponseLength::default(),
            persona: Persona::default(),
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the runtime endpoint.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the sampling temperature, clamped to [0.0, 1.0].
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    /// Sets the base system prompt.
    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Restores the default base system prompt.
    pub fn reset_system_prompt(&mut self) {
        self.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
    }

    /// Sets the response style.
    pub fn with_style(mut self, style: ResponseStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the response length.
    pub fn with_length(mut self, length: ResponseLength) -> Self {
        self.length = length;
        self
    }

    /// Sets the assistant persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Returns the directive choices as a unit.
    pub fn directive(&self) -> Directive {
        Directive {
            style: self.style,
            length: self.length,
            persona: self.persona,
        }
    }

    /// Synthesizes the full system directive text.
    pub fn system_directive(&self) -> String {
        self.directive().render(&self.system_prompt)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let mut config = ChatConfig::new();
        if let Some(model) = args.model {
            config.model = Model::parse(&model);
        }
        if let Some(endpoint) = args.endpoint {
            config.base_url = endpoint;
        }
        if let Some(temperature) = args.temperature {
            if let Ok(temperature) = temperature.parse::<f32>() {
                config.temperature = temperature.clamp(0.0, 1.0);
            }
        }
        if let Some(system) = args.system {
            config.system_prompt = system;
        }
        config.use_color = !args.no_color;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::DeepseekR1Tiny));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.style, ResponseStyle::Balanced);
        assert_eq!(config.length, ResponseLength::Balanced);
        assert_eq!(config.persona, Persona::Assistant);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("mistral".to_string()),
            endpoint: Some("http://10.0.0.5:11434".to_string()),
            temperature: Some("0.7".to_string()),
            system: Some("You are terse.".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Mistral));
        assert_eq!(config.base_url, "http://10.0.0.5:11434");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.system_prompt, "You are terse.");
        assert!(!config.use_color);
    }

    #[test]
    fn temperature_is_clamped() {
        let config = ChatConfig::new().with_temperature(1.7);
        assert_eq!(config.temperature, 1.0);
        let config = ChatConfig::new().with_temperature(-0.2);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Qwen25Coder))
            .with_base_url("http://other:11434".to_string())
            .with_temperature(0.55)
            .with_system_prompt("Answer in haiku.".to_string())
            .with_style(ResponseStyle::Casual)
            .with_length(ResponseLength::Concise)
            .with_persona(Persona::Storyteller)
            .without_color();

        assert_eq!(config.model, Model::Known(KnownModel::Qwen25Coder));
        assert_eq!(config.base_url, "http://other:11434");
        assert_eq!(config.temperature, 0.55);
        assert_eq!(config.system_prompt, "Answer in haiku.");
        assert_eq!(config.style, ResponseStyle::Casual);
        assert_eq!(config.length, ResponseLength::Concise);
        assert_eq!(config.persona, Persona::Storyteller);
        assert!(!config.use_color);
    }

    #[test]
    fn system_directive_combines_base_and_choices() {
        let config = ChatConfig::new()
            .with_system_prompt("Base.".to_string())
            .with_persona(Persona::Tutor);
        let directive = config.system_directive();
        assert!(directive.starts_with("Base. "));
        assert!(directive.contains("a patient tutor"));
    }
}
