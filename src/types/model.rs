use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a model identifier for the local runtime.
///
/// This can be a cataloged model or a custom string value for models the
/// catalog does not list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Cataloged model versions.
    Known(KnownModel),

    /// Custom model identifier (anything pulled into the local runtime).
    Custom(String),
}

/// Cataloged models with display metadata.
///
/// The catalog is static configuration: each entry carries an icon asset
/// path and a one-line specialty description for sidebar display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// DeepSeek-R1 distilled to 1.5B parameters.
    #[serde(rename = "deepseek-r1:1.5b")]
    DeepseekR1Tiny,

    /// DeepSeek-R1 distilled to 7B parameters.
    #[serde(rename = "deepseek-r1:7b")]
    DeepseekR1Small,

    /// Llama 3.2.
    #[serde(rename = "llama3.2")]
    Llama32,

    /// Qwen 2.5 Coder at 7B parameters.
    #[serde(rename = "qwen2.5-coder:7b")]
    Qwen25Coder,

    /// Mistral 7B.
    #[serde(rename = "mistral")]
    Mistral,

    /// Phi-3 mini.
    #[serde(rename = "phi3:mini")]
    Phi3Mini,
}

/// Display metadata for a cataloged model.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// The identifier the runtime knows the model by.
    pub id: &'static str,

    /// Path to the icon asset used by graphical front-ends.
    pub icon: &'static str,

    /// One-line description of what the model is good at.
    pub specialty: &'static str,
}

impl KnownModel {
    /// Every cataloged model, in display order.
    pub const CATALOG: &'static [KnownModel] = &[
        KnownModel::DeepseekR1Tiny,
        KnownModel::DeepseekR1Small,
        KnownModel::Llama32,
        KnownModel::Qwen25Coder,
        KnownModel::Mistral,
        KnownModel::Phi3Mini,
    ];

    /// Returns the display metadata for this model.
    pub fn info(&self) -> ModelInfo {
        match self {
            KnownModel::DeepseekR1Tiny => ModelInfo {
                id: "deepseek-r1:1.5b",
                icon: "assets/icons/deepseek.svg",
                specialty: "Fast reasoning on modest hardware",
            },
            KnownModel::DeepseekR1Small => ModelInfo {
                id: "deepseek-r1:7b",
                icon: "assets/icons/deepseek.svg",
                specialty: "Stronger reasoning, needs more memory",
            },
            KnownModel::Llama32 => ModelInfo {
                id: "llama3.2",
                icon: "assets/icons/llama.svg",
                specialty: "General conversation and summarization",
            },
            KnownModel::Qwen25Coder => ModelInfo {
                id: "qwen2.5-coder:7b",
                icon: "assets/icons/qwen.svg",
                specialty: "Code generation and review",
            },
            KnownModel::Mistral => ModelInfo {
                id: "mistral",
                icon: "assets/icons/mistral.svg",
                specialty: "Balanced general-purpose chat",
            },
            KnownModel::Phi3Mini => ModelInfo {
                id: "phi3:mini",
                icon: "assets/icons/phi.svg",
                specialty: "Lightweight Q&A on CPU-only machines",
            },
        }
    }

    /// Looks up a cataloged model by its runtime identifier.
    pub fn from_id(id: &str) -> Option<KnownModel> {
        KnownModel::CATALOG
            .iter()
            .copied()
            .find(|model| model.info().id == id)
    }
}

impl Model {
    /// Resolves a runtime identifier to a cataloged model when possible,
    /// falling back to a custom identifier.
    pub fn parse(id: &str) -> Model {
        match KnownModel::from_id(id) {
            Some(known) => Model::Known(known),
            None => Model::Custom(id.to_string()),
        }
    }

    /// Returns the identifier the runtime knows this model by.
    pub fn id(&self) -> &str {
        match self {
            Model::Known(known) => known.info().id,
            Model::Custom(custom) => custom,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().id)
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::parse(&model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::parse(model)
    }
}
