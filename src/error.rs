//! Application-wide error types.
//!
//! Only startup failures surface as [`AppError`]. Request-level failures are
//! folded into an `OperationResult` message before they reach the caller.

use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("llm error: {0}")]
    Llm(#[from] ProviderError),
}
