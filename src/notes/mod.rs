//! Notes — flat-file storage and intent dispatch.
//!
//! [`dispatch`] is the only way requests reach storage. It never fails: every
//! [`NoteError`] is turned into an [`OperationResult`] message.

mod dispatch;
pub mod store;

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dispatch::dispatch;
pub use store::{NOTE_EXTENSION, NoteStore, normalize_title, note_filename};

pub const MSG_CREATED: &str = "Note created successfully";
pub const MSG_NO_NOTES: &str = "No notes found";
pub const MSG_INVALID_REQUEST: &str = "Invalid request. Please specify what you want to do with the note.";

/// Where notes live. Passed explicitly with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    base_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Outcome of one request, shaped for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl OperationResult {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), filename: None }
    }

    pub fn with_file(message: impl Into<String>, filename: impl Into<String>) -> Self {
        Self { message: message.into(), filename: Some(filename.into()) }
    }
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid request: {0}")]
    Validation(&'static str),

    #[error("note not found: {filename}")]
    NotFound { filename: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl NoteError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        NoteError::Io { context: context.into(), source }
    }
}
