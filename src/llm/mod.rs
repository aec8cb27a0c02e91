//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities; clone them freely.
//! The `complete` method is `async fn` on the enum so callers need no
//! trait-object machinery.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Token accounting reported by the backend, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_input_tokens: u64,
}

impl LlmUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<LlmUsage>,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
    Qwen(providers::qwen::QwenProvider),
}

impl LlmProvider {
    /// Send `content` as the user turn, with `system` as the system prompt,
    /// and return the reply.
    pub async fn complete(&self, content: &str, system: Option<&str>) -> Result<LlmResponse, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(content, system).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(content, system).await,
            LlmProvider::Qwen(p) => p.complete(content, system).await,
        }
    }

    /// Short backend label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Dummy(_) => "dummy",
            LlmProvider::OpenAiCompatible(_) => "openai",
            LlmProvider::Qwen(_) => "qwen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_total_excludes_cached_breakdown() {
        let u = LlmUsage { input_tokens: 120, output_tokens: 30, cached_input_tokens: 100 };
        assert_eq!(u.total_tokens(), 150);
    }

    #[tokio::test]
    async fn enum_dispatches_to_dummy() {
        let p = LlmProvider::Dummy(providers::dummy::DummyProvider::with_reply("ok"));
        assert_eq!(p.name(), "dummy");
        assert_eq!(p.complete("anything", None).await.unwrap().text, "ok");
    }
}
