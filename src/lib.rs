//! noteflow — turns free-text note requests into create/read/list operations
//! over a directory of plain-text files.
//!
//! The binary entry point is `src/main.rs`; this library root exposes the
//! pipeline for integration tests and embedding.

pub mod agent;
pub mod config;
pub mod console;
pub mod error;
pub mod intent;
pub mod llm;
pub mod logger;
pub mod notes;

pub use agent::{DEFAULT_NOTES_DIR, NoteAgent};
pub use intent::{Action, ClassificationError, Intent, IntentClassifier};
pub use notes::{OperationResult, StorageConfig};
