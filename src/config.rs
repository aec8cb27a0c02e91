//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory (or
//! an explicit `--config` path), then applies `NOTEFLOW_NOTES_DIR` and
//! `NOTEFLOW_LOG_LEVEL` env overrides. The LLM API key only ever comes from
//! `LLM_API_KEY`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::notes::StorageConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` or `[llm.qwen]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"`, `"openai"`, `"qwen"`).
    /// Maps to `default` in `[llm]`.
    pub provider: String,
    pub openai: OpenAiConfig,
    pub qwen: OpenAiConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Append logs here instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Root directory for note files (already expanded, no `~`).
    pub notes_dir: PathBuf,
    /// Directory searched for prompt overrides (`intent.md`).
    pub prompts_dir: PathBuf,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY`. `None` for keyless local models.
    pub llm_api_key: Option<String>,
}

impl Config {
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(&self.notes_dir)
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    notes: RawNotes,
    #[serde(default)]
    prompts: RawPrompts,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_file: Option<String>,
}

impl Default for RawApp {
    fn default() -> Self {
        Self { log_level: default_log_level(), log_file: None }
    }
}

#[derive(Deserialize)]
struct RawNotes {
    #[serde(default = "default_notes_dir")]
    dir: String,
}

impl Default for RawNotes {
    fn default() -> Self {
        Self { dir: default_notes_dir() }
    }
}

#[derive(Deserialize)]
struct RawPrompts {
    #[serde(default = "default_prompts_dir")]
    dir: String,
}

impl Default for RawPrompts {
    fn default() -> Self {
        Self { dir: default_prompts_dir() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
    #[serde(default)]
    qwen: RawQwenConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            openai: RawOpenAiConfig::default(),
            qwen: RawQwenConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// `[llm.qwen]` — defaults target a local Ollama serving Qwen 2.5.
#[derive(Deserialize)]
struct RawQwenConfig {
    #[serde(default = "default_qwen_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_qwen_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawQwenConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_qwen_api_base_url(),
            model: default_qwen_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_notes_dir() -> String { crate::agent::DEFAULT_NOTES_DIR.to_string() }
fn default_prompts_dir() -> String { "config/prompts".to_string() }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_qwen_api_base_url() -> String { "http://127.0.0.1:11434/v1/chat/completions".to_string() }
fn default_qwen_model() -> String { "qwen2.5".to_string() }
fn default_temperature() -> f32 { 0.0 }
fn default_timeout_seconds() -> u64 { 60 }

/// Load config, then apply env-var overrides.
///
/// An explicit `path` must exist. Without one, `config/default.toml` is used
/// when present and built-in defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<Config, AppError> {
    let notes_dir_override = env::var("NOTEFLOW_NOTES_DIR").ok();
    let log_level_override = env::var("NOTEFLOW_LOG_LEVEL").ok();
    let api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let raw = match path {
        Some(p) => read_raw(p)?,
        None if default_path.exists() => read_raw(default_path)?,
        None => RawConfig::default(),
    };

    Ok(resolve(
        raw,
        notes_dir_override.as_deref(),
        log_level_override.as_deref(),
        api_key,
    ))
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    notes_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = read_raw(path)?;
    Ok(resolve(raw, notes_dir_override, log_level_override, None))
}

fn read_raw(path: &Path) -> Result<RawConfig, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))
}

fn resolve(
    raw: RawConfig,
    notes_dir_override: Option<&str>,
    log_level_override: Option<&str>,
    llm_api_key: Option<String>,
) -> Config {
    let notes_dir = expand_home(notes_dir_override.unwrap_or(&raw.notes.dir));
    let log_level = log_level_override.unwrap_or(&raw.app.log_level).to_string();

    Config {
        log_level,
        log_file: raw.app.log_file.as_deref().map(expand_home),
        notes_dir,
        prompts_dir: expand_home(&raw.prompts.dir),
        llm: LlmConfig {
            provider: raw.llm.provider,
            openai: OpenAiConfig {
                api_base_url: raw.llm.openai.api_base_url,
                model: raw.llm.openai.model,
                temperature: raw.llm.openai.temperature,
                timeout_seconds: raw.llm.openai.timeout_seconds,
            },
            qwen: OpenAiConfig {
                api_base_url: raw.llm.qwen.api_base_url,
                model: raw.llm.qwen.model,
                temperature: raw.llm.qwen.temperature,
                timeout_seconds: raw.llm.qwen.timeout_seconds,
            },
        },
        llm_api_key,
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default(notes_dir: &Path) -> Self {
        resolve(
            RawConfig::default(),
            notes_dir.to_str(),
            None,
            None,
        )
    }
}
