//! Intent classification — free text in, structured [`Intent`] out.
//!
//! The classifier asks the configured [`LlmProvider`] for a JSON object and
//! parses it. It only checks shape: whether the fields an action needs are
//! actually present is the dispatcher's call.

pub mod prompt;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm::{LlmProvider, ProviderError};

/// Longest slice of a bad model reply quoted back in an error.
const REPLY_EXCERPT_CHARS: usize = 80;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("model request failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("no JSON object in model reply: {0:?}")]
    NoJson(String),
    #[error("malformed intent: {0}")]
    Malformed(String),
    #[error("unsupported action: {0:?}")]
    UnknownAction(String),
}

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    List,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Create, Action::Read, Action::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClassificationError::UnknownAction(s.to_string()))
    }
}

/// What the user asked for. Produced once per request, consumed by dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub action: Action,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Intent {
    pub fn create(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { action: Action::Create, title: Some(title.into()), content: Some(content.into()) }
    }

    pub fn read(title: impl Into<String>) -> Self {
        Self { action: Action::Read, title: Some(title.into()), content: None }
    }

    pub fn list() -> Self {
        Self { action: Action::List, title: None, content: None }
    }

    /// Title, treating an empty string as absent.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Content, treating an empty string as absent.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Wire shape of the model reply. `action` stays a string here so an
/// unsupported value gets its own error instead of a generic serde one.
#[derive(Deserialize)]
struct RawIntent {
    action: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Parse a model reply into an [`Intent`].
///
/// Prose or Markdown fences around the object are tolerated: the outermost
/// `{ ... }` span is taken as the payload.
pub fn parse_intent(reply: &str) -> Result<Intent, ClassificationError> {
    let json = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(ClassificationError::NoJson(excerpt(reply))),
    };

    let raw: RawIntent = serde_json::from_str(json)
        .map_err(|e| ClassificationError::Malformed(e.to_string()))?;

    Ok(Intent {
        action: raw.action.parse()?,
        title: raw.title,
        content: raw.content,
    })
}

fn excerpt(reply: &str) -> String {
    let trimmed = reply.trim();
    match trimmed.char_indices().nth(REPLY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

// ── Classifier ────────────────────────────────────────────────────────────────

/// Maps user text to an [`Intent`] through an LLM provider.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    provider: LlmProvider,
    system_prompt: String,
}

impl IntentClassifier {
    pub fn new(provider: LlmProvider, system_prompt: impl Into<String>) -> Self {
        Self { provider, system_prompt: system_prompt.into() }
    }

    /// Classifier using `intent.md` from `prompts_dir`, or the built-in prompt.
    pub fn with_prompts_dir(provider: LlmProvider, prompts_dir: impl AsRef<Path>) -> Self {
        Self::new(provider, prompt::intent_system_prompt(prompts_dir))
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub async fn classify(&self, text: &str) -> Result<Intent, ClassificationError> {
        let response = self.provider.complete(text, Some(&self.system_prompt)).await?;

        if let Some(usage) = response.usage {
            debug!(
                provider = self.provider.name(),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                cached_input_tokens = usage.cached_input_tokens,
                total_tokens = usage.total_tokens(),
                "intent classification usage"
            );
        }

        parse_intent(&response.text)
    }
}
