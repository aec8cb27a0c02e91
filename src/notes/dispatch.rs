use tracing::{debug, info, warn};

use super::{
    MSG_CREATED, MSG_INVALID_REQUEST, MSG_NO_NOTES, NoteError, NoteStore, OperationResult,
    StorageConfig, normalize_title,
};
use crate::intent::{Action, Intent};

/// A validated intent: the fields each action needs are known to be present.
#[derive(Debug, PartialEq, Eq)]
enum NoteOp<'a> {
    Create { title: &'a str, content: &'a str },
    Read { title: &'a str },
    List,
}

impl<'a> NoteOp<'a> {
    fn from_intent(intent: &'a Intent) -> Result<Self, NoteError> {
        match intent.action {
            Action::Create => match (intent.title(), intent.content()) {
                (Some(title), Some(content)) => Ok(NoteOp::Create { title: usable(title)?, content }),
                _ => Err(NoteError::Validation("create needs a title and content")),
            },
            Action::Read => match intent.title() {
                Some(title) => Ok(NoteOp::Read { title: usable(title)? }),
                None => Err(NoteError::Validation("read needs a title")),
            },
            Action::List => Ok(NoteOp::List),
        }
    }
}

/// A title like `".txt"` normalizes to an empty stem and would name a hidden file.
fn usable(title: &str) -> Result<&str, NoteError> {
    if normalize_title(title).is_empty() {
        Err(NoteError::Validation("title has no usable characters"))
    } else {
        Ok(title)
    }
}

/// Run the file operation `intent` asks for against `config.base_dir`.
///
/// An intent missing a required field gets the invalid-request reply and
/// storage is left untouched.
pub async fn dispatch(intent: &Intent, config: &StorageConfig) -> OperationResult {
    let op = match NoteOp::from_intent(intent) {
        Ok(op) => op,
        Err(e) => {
            info!(action = %intent.action, reason = %e, "rejecting intent");
            return OperationResult::message(MSG_INVALID_REQUEST);
        }
    };

    let store = NoteStore::new(config.base_dir());
    debug!(?op, base_dir = %store.base_dir().display(), "dispatching note operation");

    match op {
        NoteOp::Create { title, content } => create(&store, title, content).await,
        NoteOp::Read { title } => read(&store, title).await,
        NoteOp::List => list(&store).await,
    }
}

async fn create(store: &NoteStore, title: &str, content: &str) -> OperationResult {
    match store.write(title, content).await {
        Ok(filename) => {
            info!(%filename, bytes = content.len(), "note created");
            OperationResult::with_file(MSG_CREATED, filename)
        }
        Err(e) => {
            warn!(error = %e, "create failed");
            OperationResult::message(format!("Failed to create note: {e}"))
        }
    }
}

async fn read(store: &NoteStore, title: &str) -> OperationResult {
    match store.read(title).await {
        Ok((filename, content)) => OperationResult::with_file(format!("Note content: {content}"), filename),
        Err(NoteError::NotFound { filename }) => {
            info!(%filename, "note not found");
            OperationResult::message(format!("Note not found: {filename}"))
        }
        Err(e) => {
            warn!(error = %e, "read failed");
            OperationResult::message(format!("Error reading note: {e}"))
        }
    }
}

async fn list(store: &NoteStore) -> OperationResult {
    match store.list().await {
        Ok(titles) if titles.is_empty() => OperationResult::message(MSG_NO_NOTES),
        Ok(titles) => {
            let lines = titles.iter().map(|t| format!("- {t}")).collect::<Vec<_>>().join("\n");
            OperationResult::message(format!("Found notes:\n{lines}"))
        }
        Err(e) => {
            warn!(error = %e, "list failed");
            OperationResult::message(format!("Error listing notes: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> StorageConfig {
        StorageConfig::new(tmp.path().join("notes"))
    }

    #[test]
    fn validation_per_action() {
        let create = Intent::create("t", "c");
        assert_eq!(NoteOp::from_intent(&create).unwrap(), NoteOp::Create { title: "t", content: "c" });

        let no_content = Intent { content: None, ..Intent::create("t", "c") };
        assert!(matches!(NoteOp::from_intent(&no_content), Err(NoteError::Validation(_))));

        let empty_title = Intent::create("", "c");
        assert!(matches!(NoteOp::from_intent(&empty_title), Err(NoteError::Validation(_))));

        let read_untitled = Intent { title: None, ..Intent::read("x") };
        assert!(matches!(NoteOp::from_intent(&read_untitled), Err(NoteError::Validation(_))));

        // List ignores stray fields.
        let list = Intent { title: Some("x".into()), ..Intent::list() };
        assert_eq!(NoteOp::from_intent(&list).unwrap(), NoteOp::List);
    }

    #[tokio::test]
    async fn create_writes_normalized_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = storage(&tmp);
        let res = dispatch(
            &Intent::create("Meeting Tomorrow", "Meeting scheduled for tomorrow"),
            &cfg,
        )
        .await;

        assert_eq!(res, OperationResult::with_file(MSG_CREATED, "meeting_tomorrow.txt"));
        let on_disk = std::fs::read_to_string(cfg.base_dir().join("meeting_tomorrow.txt")).unwrap();
        assert_eq!(on_disk, "Meeting scheduled for tomorrow");
    }

    #[tokio::test]
    async fn create_without_content_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let cfg = storage(&tmp);
        let intent = Intent { content: None, ..Intent::create("Ghost", "x") };

        let res = dispatch(&intent, &cfg).await;
        assert_eq!(res, OperationResult::message(MSG_INVALID_REQUEST));
        assert!(!cfg.base_dir().exists());
    }

    #[tokio::test]
    async fn title_with_empty_stem_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let cfg = storage(&tmp);

        for title in [".txt", ".TXT.txt"] {
            let res = dispatch(&Intent::create(title, "x"), &cfg).await;
            assert_eq!(res, OperationResult::message(MSG_INVALID_REQUEST), "title: {title:?}");
            let res = dispatch(&Intent::read(title), &cfg).await;
            assert_eq!(res, OperationResult::message(MSG_INVALID_REQUEST), "title: {title:?}");
        }

        assert!(!cfg.base_dir().exists());
        assert_eq!(dispatch(&Intent::list(), &cfg).await.message, MSG_NO_NOTES);
    }

    #[tokio::test]
    async fn read_returns_content_and_filename() {
        let tmp = TempDir::new().unwrap();
        let cfg = storage(&tmp);
        dispatch(&Intent::create("Groceries", "milk, eggs"), &cfg).await;

        let res = dispatch(&Intent::read("groceries.txt"), &cfg).await;
        assert_eq!(res.message, "Note content: milk, eggs");
        assert_eq!(res.filename.as_deref(), Some("groceries.txt"));
    }

    #[tokio::test]
    async fn read_missing_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let res = dispatch(&Intent::read("Lost Note"), &storage(&tmp)).await;
        assert_eq!(res.message, "Note not found: lost_note.txt");
        assert!(res.filename.is_none());
    }

    #[tokio::test]
    async fn list_empty_then_populated() {
        let tmp = TempDir::new().unwrap();
        let cfg = storage(&tmp);
        assert_eq!(dispatch(&Intent::list(), &cfg).await.message, MSG_NO_NOTES);

        dispatch(&Intent::create("Trip Plan", "pack"), &cfg).await;
        dispatch(&Intent::create("Groceries", "milk"), &cfg).await;

        let res = dispatch(&Intent::list(), &cfg).await;
        assert_eq!(res.message, "Found notes:\n- groceries\n- trip_plan");
        assert!(res.filename.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn io_failure_is_reported_not_raised() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("notes");
        std::fs::write(&blocker, "a file where the dir should be").unwrap();
        let cfg = StorageConfig::new(&blocker);

        let res = dispatch(&Intent::create("a", "b"), &cfg).await;
        assert!(res.message.starts_with("Failed to create note: "), "{}", res.message);
        assert!(res.filename.is_none());

        let res = dispatch(&Intent::read("a"), &cfg).await;
        assert!(res.message.starts_with("Error reading note: "), "{}", res.message);

        let res = dispatch(&Intent::list(), &cfg).await;
        assert!(res.message.starts_with("Error listing notes: "), "{}", res.message);
    }
}
