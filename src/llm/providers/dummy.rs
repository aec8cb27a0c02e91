//! Dummy LLM provider for offline runs and tests.
//!
//! With a canned reply it returns that text verbatim. Otherwise it guesses a
//! note intent from a handful of keywords and answers with the same JSON
//! shape a real model is prompted to produce, so the whole pipeline can run
//! without an API key.

use serde_json::json;

use crate::llm::{LlmResponse, ProviderError};

/// Words kept from the request body when deriving a title.
const TITLE_WORDS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct DummyProvider {
    reply: Option<String>,
}

impl DummyProvider {
    /// Provider that answers every request with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()) }
    }

    pub async fn complete(&self, content: &str, _system: Option<&str>) -> Result<LlmResponse, ProviderError> {
        let text = match &self.reply {
            Some(reply) => reply.clone(),
            None => guess_intent(content).to_string(),
        };
        Ok(LlmResponse { text, usage: None })
    }
}

fn guess_intent(content: &str) -> serde_json::Value {
    let text = content.trim();
    let lower = text.to_lowercase();

    if lower == "list"
        || lower.starts_with("list ")
        || lower.contains("my notes")
        || lower.contains("all notes")
    {
        return json!({ "action": "list", "title": null, "content": null });
    }

    for verb in ["read ", "open ", "show "] {
        if let Some(rest) = strip_prefix_ci(text, verb) {
            let rest = rest.trim();
            let title = strip_prefix_ci(rest, "the note ")
                .or_else(|| strip_prefix_ci(rest, "note "))
                .unwrap_or(rest)
                .trim();
            return json!({ "action": "read", "title": title, "content": null });
        }
    }

    let body = ["about ", "note: ", "note that "]
        .iter()
        .find_map(|marker| after_ci(text, marker))
        .unwrap_or(text)
        .trim()
        .trim_end_matches(['.', '!', '?']);

    json!({ "action": "create", "title": title_from(body), "content": body })
}

/// Case-insensitive ASCII prefix strip.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Text following the first case-insensitive ASCII match of `marker`.
/// Offsets come from `text` itself, so non-ASCII case folding cannot shift them.
fn after_ci<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.char_indices()
        .find_map(|(i, _)| strip_prefix_ci(&text[i..], marker))
}

fn title_from(body: &str) -> String {
    body.split_whitespace()
        .filter(|w| !matches!(w.to_lowercase().as_str(), "the" | "a" | "an"))
        .take(TITLE_WORDS)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn guess(input: &str) -> serde_json::Value {
        let text = DummyProvider::default().complete(input, None).await.unwrap().text;
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn canned_reply_is_returned_verbatim() {
        let p = DummyProvider::with_reply("not json at all");
        let resp = p.complete("hello", Some("system")).await.unwrap();
        assert_eq!(resp.text, "not json at all");
        assert!(resp.usage.is_none());
    }

    #[tokio::test]
    async fn list_phrases() {
        for input in ["List notes", "show me all my notes", "list"] {
            assert_eq!(guess(input).await["action"], "list", "input: {input}");
        }
    }

    #[tokio::test]
    async fn read_takes_rest_as_title() {
        let v = guess("Read meeting_tomorrow.txt").await;
        assert_eq!(v["action"], "read");
        assert_eq!(v["title"], "meeting_tomorrow.txt");

        let v = guess("open the note Trip Plan").await;
        assert_eq!(v["title"], "Trip Plan");
    }

    #[tokio::test]
    async fn create_uses_text_after_about() {
        let v = guess("Take a note about the meeting tomorrow.").await;
        assert_eq!(v["action"], "create");
        assert_eq!(v["title"], "Meeting Tomorrow");
        assert_eq!(v["content"], "the meeting tomorrow");
    }

    #[tokio::test]
    async fn title_is_capped() {
        let v = guess("note: finding waldo can be very difficult").await;
        assert_eq!(v["title"], "Finding Waldo Can Be");
        assert_eq!(v["content"], "finding waldo can be very difficult");
    }

    #[tokio::test]
    async fn body_offset_survives_case_folding_width_changes() {
        // `İ` and `ẞ` change byte length when lower-cased.
        for input in ["İİ note about groceries", "ẞẞ note about groceries", "Ünï NOTE ABOUT groceries"] {
            let v = guess(input).await;
            assert_eq!(v["content"], "groceries", "input: {input}");
            assert_eq!(v["title"], "Groceries", "input: {input}");
        }
    }

    #[test]
    fn after_ci_matches_anywhere() {
        assert_eq!(after_ci("Take a note About x", "about "), Some("x"));
        assert_eq!(after_ci("日本 note: y", "note: "), Some("y"));
        assert_eq!(after_ci("nothing here", "about "), None);
    }

    #[test]
    fn strip_prefix_ci_handles_short_and_non_ascii_input() {
        assert_eq!(strip_prefix_ci("READ x", "read "), Some("x"));
        assert_eq!(strip_prefix_ci("re", "read "), None);
        assert_eq!(strip_prefix_ci("réad x", "read "), None);
    }
}
