//! Request pipeline: classify the text, then dispatch the intent.
//!
//! Each request is independent. The classifier's output gates the
//! dispatcher; nothing is carried over between calls.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::intent::IntentClassifier;
use crate::llm::providers;
use crate::notes::{self, OperationResult, StorageConfig};

/// Notes directory used when the caller does not name one.
pub const DEFAULT_NOTES_DIR: &str = "notes";

#[derive(Debug, Clone)]
pub struct NoteAgent {
    classifier: IntentClassifier,
    storage: StorageConfig,
}

impl NoteAgent {
    pub fn new(classifier: IntentClassifier, storage: StorageConfig) -> Self {
        Self { classifier, storage }
    }

    /// Build the provider and prompt named by `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
        let classifier = IntentClassifier::with_prompts_dir(provider, &config.prompts_dir);
        Ok(Self::new(classifier, config.storage()))
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Handle `text` against the configured notes directory.
    pub async fn handle(&self, text: &str) -> OperationResult {
        self.run(text, &self.storage).await
    }

    /// Handle `text` against an explicit notes directory.
    pub async fn handle_request(&self, text: &str, base_dir: impl AsRef<Path>) -> OperationResult {
        self.run(text, &StorageConfig::new(base_dir.as_ref())).await
    }

    async fn run(&self, text: &str, storage: &StorageConfig) -> OperationResult {
        let intent = match self.classifier.classify(text).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "intent classification failed");
                return OperationResult::message(format!("Failed to understand request: {e}"));
            }
        };

        debug!(?intent, "intent extracted");
        notes::dispatch(&intent, storage).await
    }
}
