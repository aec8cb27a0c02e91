//! Layered prompt builder for the intent classifier.
//!
//! Prompts are assembled from plain-text fragments stored under the
//! configured prompts directory (`config/prompts/` by default). Each layer is
//! appended in order; missing files are skipped so layers stay optional.
//!
//! Variable substitution uses `{{key}}` syntax and is applied once at
//! [`build()`](PromptBuilder::build) time, after all layers are joined.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Action;

const SEPARATOR: &str = "\n\n";

/// Override file looked up in the prompts directory.
pub const INTENT_PROMPT_FILE: &str = "intent.md";

/// Used when no `intent.md` override exists.
pub const BUILTIN_INTENT_PROMPT: &str = r#"You are an intent extraction assistant. Analyze the user's input to determine what they want to do with their notes and extract the relevant information.

Reply with a single JSON object and nothing else:
- "action": one of {{actions}}. Use "create" for a new note, "read" to view an existing note, "list" to show all notes.
- "title": a clear, descriptive title for the note, or null for "list".
- "content": the note body for "create", otherwise null.

Example 1. Input: "Take a note about the meeting tomorrow"
Output: {"action": "create", "title": "Meeting Tomorrow", "content": "Meeting scheduled for tomorrow"}

Example 2. Input: "show me all my notes" or "list notes"
Output: {"action": "list", "title": null, "content": null}"#;

/// Fluent builder that assembles a layered prompt from template files.
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append a layer by loading `filename` from the prompts directory.
    /// Silently skips the layer when the file does not exist or is blank.
    pub fn layer(mut self, filename: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    self.parts.push(trimmed.to_string());
                }
            }
            Err(_) => {
                tracing::debug!("prompt: layer '{}' not found, skipped", path.display());
            }
        }
        self
    }

    /// Directly append a text fragment.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Append `text` only when no layer has been loaded so far.
    pub fn or_append(self, text: impl Into<String>) -> Self {
        if self.parts.is_empty() { self.append(text) } else { self }
    }

    /// Register a single `{{key}}` → `value` substitution.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Assemble all layers, join with blank lines, and apply variable substitution.
    pub fn build(self) -> String {
        let mut prompt = self.parts.join(SEPARATOR);
        for (k, v) in &self.vars {
            let placeholder = format!("{{{{{}}}}}", k);
            prompt = prompt.replace(&placeholder, v);
        }
        prompt
    }
}

/// Appended when an override never mentions JSON. JSON-mode endpoints reject
/// requests whose messages lack the word.
pub const JSON_REPLY_LINE: &str = "Reply with a single JSON object.";

/// System prompt for intent extraction: `intent.md` from `prompts_dir` if
/// present, otherwise [`BUILTIN_INTENT_PROMPT`].
pub fn intent_system_prompt(prompts_dir: impl AsRef<Path>) -> String {
    let actions = Action::ALL
        .iter()
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let prompt = PromptBuilder::new(prompts_dir.as_ref())
        .layer(INTENT_PROMPT_FILE)
        .or_append(BUILTIN_INTENT_PROMPT)
        .var("actions", actions)
        .build();

    if prompt.to_ascii_lowercase().contains("json") {
        prompt
    } else {
        PromptBuilder::new(prompts_dir.as_ref()).append(prompt).append(JSON_REPLY_LINE).build()
    }
}
