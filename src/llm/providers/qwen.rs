//! Qwen chat completion provider.
//!
//! Wraps the OpenAI-compatible provider and reads `[llm.qwen]` so a local
//! Ollama/Qwen endpoint can be selected with `llm.default = "qwen"` while
//! `[llm.openai]` stays configured alongside it.

use crate::llm::{LlmResponse, ProviderError};

use super::openai_compatible::OpenAiCompatibleProvider;

#[derive(Debug, Clone)]
pub struct QwenProvider {
    inner: OpenAiCompatibleProvider,
}

impl QwenProvider {
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let inner = OpenAiCompatibleProvider::new(
            api_base_url,
            model,
            temperature,
            timeout_seconds,
            api_key,
        )?;
        Ok(Self { inner })
    }

    pub async fn complete(&self, content: &str, system: Option<&str>) -> Result<LlmResponse, ProviderError> {
        self.inner.complete(content, system).await
    }
}
