//! Flat-file note storage: one `<normalized title>.txt` per note.
//!
//! Every operation creates the base directory first, so a fresh install
//! needs no setup step. Writes truncate; there is no locking or atomic
//! rename, so concurrent writers to one title race and the last one wins.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::NoteError;

/// Extension of every note file.
pub const NOTE_EXTENSION: &str = ".txt";

/// Canonical filesystem key for a title.
///
/// Drops a trailing `.txt` (any case), lower-cases, and turns spaces and
/// path separators into `_`, so `"Meeting Tomorrow"` and
/// `"meeting_tomorrow.txt"` name the same note. Idempotent.
pub fn normalize_title(title: &str) -> String {
    let mut stem = title;
    // Strip every trailing extension, or normalizing twice would differ.
    while let Some(rest) = strip_extension(stem) {
        stem = rest;
    }

    stem.to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

fn strip_extension(title: &str) -> Option<&str> {
    let cut = title.len().checked_sub(NOTE_EXTENSION.len())?;
    if title.is_char_boundary(cut) && title[cut..].eq_ignore_ascii_case(NOTE_EXTENSION) {
        Some(&title[..cut])
    } else {
        None
    }
}

/// File name (not path) a title is stored under.
pub fn note_filename(title: &str) -> String {
    format!("{}{NOTE_EXTENSION}", normalize_title(title))
}

#[derive(Debug, Clone)]
pub struct NoteStore {
    base_dir: PathBuf,
}

impl NoteStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn ensure_dir(&self) -> Result<(), NoteError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| NoteError::io(format!("cannot create {}", self.base_dir.display()), e))
    }

    /// Write `content` under `title`, replacing any previous note in full.
    /// Returns the file name written.
    pub async fn write(&self, title: &str, content: &str) -> Result<String, NoteError> {
        self.ensure_dir().await?;
        let filename = note_filename(title);
        let path = self.base_dir.join(&filename);

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(%filename, "overwriting existing note");
        }

        fs::write(&path, content)
            .await
            .map_err(|e| NoteError::io(format!("cannot write {filename}"), e))?;
        Ok(filename)
    }

    /// Read the note stored under `title`. Returns `(filename, content)`.
    pub async fn read(&self, title: &str) -> Result<(String, String), NoteError> {
        self.ensure_dir().await?;
        let filename = note_filename(title);
        let path = self.base_dir.join(&filename);

        match fs::read_to_string(&path).await {
            Ok(content) => Ok((filename, content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NoteError::NotFound { filename }),
            Err(e) => Err(NoteError::io(format!("cannot read {filename}"), e)),
        }
    }

    /// Titles of all stored notes (file names minus the extension), sorted.
    pub async fn list(&self) -> Result<Vec<String>, NoteError> {
        self.ensure_dir().await?;
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| NoteError::io(format!("cannot list {}", self.base_dir.display()), e))?;

        let mut titles = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| NoteError::io(format!("cannot list {}", self.base_dir.display()), e))?
        {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let name = entry.file_name();
            if let Some(title) = name.to_str().and_then(|n| n.strip_suffix(NOTE_EXTENSION)) {
                titles.push(title.to_string());
            }
        }

        titles.sort();
        Ok(titles)
    }
}
