//! System directive synthesis and prompt assembly.
//!
//! A prompt is the system directive followed by the session's history in
//! order. Message content is carried as literal text end to end: nothing
//! here or downstream treats `{placeholder}`-style syntax in a message as
//! a template variable.

use std::fmt;
use std::str::FromStr;

use crate::types::{Message, PromptMessage};

/// Tone of the assistant's responses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ResponseStyle {
    /// No particular tone.
    #[default]
    Balanced,

    /// Formal register.
    Formal,

    /// Conversational register.
    Casual,

    /// Precise, jargon-friendly register.
    Technical,
}

/// Target verbosity of the assistant's responses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ResponseLength {
    /// Moderate detail.
    #[default]
    Balanced,

    /// Short answers.
    Concise,

    /// Long-form answers.
    Detailed,
}

/// The character the assistant adopts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Persona {
    /// A general-purpose helper.
    #[default]
    Assistant,

    /// A patient teacher.
    Tutor,

    /// A pragmatic software engineer.
    Engineer,

    /// An imaginative storyteller.
    Storyteller,
}

impl ResponseStyle {
    /// Every style choice, in display order.
    pub const ALL: &'static [ResponseStyle] = &[
        ResponseStyle::Balanced,
        ResponseStyle::Formal,
        ResponseStyle::Casual,
        ResponseStyle::Technical,
    ];

    /// The phrase interpolated into the system directive.
    pub fn phrase(&self) -> &'static str {
        match self {
            ResponseStyle::Balanced => "balanced",
            ResponseStyle::Formal => "formal",
            ResponseStyle::Casual => "casual",
            ResponseStyle::Technical => "technical",
        }
    }
}

impl ResponseLength {
    /// Every length choice, in display order.
    pub const ALL: &'static [ResponseLength] = &[
        ResponseLength::Balanced,
        ResponseLength::Concise,
        ResponseLength::Detailed,
    ];

    /// The phrase interpolated into the system directive.
    pub fn phrase(&self) -> &'static str {
        match self {
            ResponseLength::Balanced => "moderately detailed",
            ResponseLength::Concise => "concise",
            ResponseLength::Detailed => "thorough and detailed",
        }
    }
}

impl Persona {
    /// Every persona choice, in display order.
    pub const ALL: &'static [Persona] = &[
        Persona::Assistant,
        Persona::Tutor,
        Persona::Engineer,
        Persona::Storyteller,
    ];

    /// The phrase interpolated into the system directive.
    pub fn phrase(&self) -> &'static str {
        match self {
            Persona::Assistant => "a helpful general-purpose assistant",
            Persona::Tutor => "a patient tutor",
            Persona::Engineer => "a pragmatic software engineer",
            Persona::Storyteller => "an imaginative storyteller",
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStyle::Balanced => write!(f, "balanced"),
            ResponseStyle::Formal => write!(f, "formal"),
            ResponseStyle::Casual => write!(f, "casual"),
            ResponseStyle::Technical => write!(f, "technical"),
        }
    }
}

impl fmt::Display for ResponseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseLength::Balanced => write!(f, "balanced"),
            ResponseLength::Concise => write!(f, "concise"),
            ResponseLength::Detailed => write!(f, "detailed"),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Assistant => write!(f, "assistant"),
            Persona::Tutor => write!(f, "tutor"),
            Persona::Engineer => write!(f, "engineer"),
            Persona::Storyteller => write!(f, "storyteller"),
        }
    }
}

impl FromStr for ResponseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balanced" => Ok(ResponseStyle::Balanced),
            "formal" => Ok(ResponseStyle::Formal),
            "casual" => Ok(ResponseStyle::Casual),
            "technical" => Ok(ResponseStyle::Technical),
            other => Err(format!("unrecognized style: {other}")),
        }
    }
}

impl FromStr for ResponseLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balanced" => Ok(ResponseLength::Balanced),
            "concise" => Ok(ResponseLength::Concise),
            "detailed" => Ok(ResponseLength::Detailed),
            other => Err(format!("unrecognized length: {other}")),
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assistant" => Ok(Persona::Assistant),
            "tutor" => Ok(Persona::Tutor),
            "engineer" => Ok(Persona::Engineer),
            "storyteller" => Ok(Persona::Storyteller),
            other => Err(format!("unrecognized persona: {other}")),
        }
    }
}

/// The response-shaping choices interpolated into the system directive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Directive {
    /// Tone choice.
    pub style: ResponseStyle,

    /// Verbosity choice.
    pub length: ResponseLength,

    /// Persona choice.
    pub persona: Persona,
}

impl Directive {
    /// Synthesizes the system directive text from the base prompt and the
    /// three choices, using a fixed phrase pattern.
    pub fn render(&self, base: &str) -> String {
        format!(
            "{base} Adopt the persona of {persona}. Keep responses {length} and use a {style} tone.",
            persona = self.persona.phrase(),
            length = self.length.phrase(),
            style = self.style.phrase(),
        )
    }
}

/// Builds an ordered prompt from a system directive and session history.
///
/// The system segment comes first, followed by one segment per message in
/// original order with its role preserved. Content is copied verbatim.
pub fn build_prompt(system_text: &str, messages: &[Message]) -> Vec<PromptMessage> {
    let mut prompt = Vec::with_capacity(messages.len() + 1);
    prompt.push(PromptMessage::system(system_text));
    prompt.extend(messages.iter().map(PromptMessage::from));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromptRole;

    #[test]
    fn prompt_preserves_order_and_roles() {
        let messages = vec![
            Message::user("u1"),
            Message::assistant("a1"),
            Message::user("u2"),
        ];
        let prompt = build_prompt("S", &messages);
        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0].role, PromptRole::System);
        assert_eq!(prompt[0].content, "S");
        assert_eq!(prompt[1].role, PromptRole::User);
        assert_eq!(prompt[1].content, "u1");
        assert_eq!(prompt[2].role, PromptRole::Assistant);
        assert_eq!(prompt[2].content, "a1");
        assert_eq!(prompt[3].role, PromptRole::User);
        assert_eq!(prompt[3].content, "u2");
    }

    #[test]
    fn template_syntax_in_content_stays_literal() {
        let messages = vec![Message::user("show me {name} and {{escaped}} braces")];
        let prompt = build_prompt("S", &messages);
        assert_eq!(prompt[1].content, "show me {name} and {{escaped}} braces");
    }

    #[test]
    fn empty_history_is_just_the_system_segment() {
        let prompt = build_prompt("S", &[]);
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt[0].role, PromptRole::System);
    }

    #[test]
    fn directive_interpolates_all_choices() {
        let directive = Directive {
            style: ResponseStyle::Technical,
            length: ResponseLength::Concise,
            persona: Persona::Engineer,
        };
        let text = directive.render("You are a helpful and informative AI assistant.");
        assert_eq!(
            text,
            "You are a helpful and informative AI assistant. Adopt the persona of \
             a pragmatic software engineer. Keep responses concise and use a technical tone."
        );
    }

    #[test]
    fn choice_parsing_round_trips() {
        for style in ResponseStyle::ALL {
            assert_eq!(style.to_string().parse::<ResponseStyle>(), Ok(*style));
        }
        for length in ResponseLength::ALL {
            assert_eq!(length.to_string().parse::<ResponseLength>(), Ok(*length));
        }
        for persona in Persona::ALL {
            assert_eq!(persona.to_string().parse::<Persona>(), Ok(*persona));
        }
        assert!("sarcastic".parse::<ResponseStyle>().is_err());
    }
}
