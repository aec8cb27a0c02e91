//! End-to-end request handling through the public API, offline.

use std::fs;

use noteflow::intent::IntentClassifier;
use noteflow::llm::LlmProvider;
use noteflow::llm::providers::dummy::DummyProvider;
use noteflow::notes::{MSG_CREATED, MSG_INVALID_REQUEST, MSG_NO_NOTES};
use noteflow::{NoteAgent, OperationResult, StorageConfig};
use tempfile::TempDir;

fn keyword_agent(tmp: &TempDir) -> NoteAgent {
    let provider = LlmProvider::Dummy(DummyProvider::default());
    NoteAgent::new(
        IntentClassifier::with_prompts_dir(provider, tmp.path().join("no-prompts")),
        StorageConfig::new(tmp.path().join("notes")),
    )
}

fn canned_agent(tmp: &TempDir, reply: &str) -> NoteAgent {
    let provider = LlmProvider::Dummy(DummyProvider::with_reply(reply));
    NoteAgent::new(
        IntentClassifier::new(provider, "system"),
        StorageConfig::new(tmp.path().join("notes")),
    )
}

#[tokio::test]
async fn create_read_list_flow() {
    let tmp = TempDir::new().unwrap();
    let agent = keyword_agent(&tmp);

    let created = agent
        .handle("Take a note about how finding waldo can be very difficult.")
        .await;
    assert_eq!(created.message, MSG_CREATED);
    let filename = created.filename.expect("create returns a filename");
    assert_eq!(filename, "how_finding_waldo_can.txt");

    let read = agent.handle(&format!("Read {filename}")).await;
    assert_eq!(read.message, "Note content: how finding waldo can be very difficult");
    assert_eq!(read.filename.as_deref(), Some(filename.as_str()));

    let listed = agent.handle("List notes").await;
    assert_eq!(listed.message, "Found notes:\n- how_finding_waldo_can");
}

#[tokio::test]
async fn list_on_fresh_directory() {
    let tmp = TempDir::new().unwrap();
    let res = keyword_agent(&tmp).handle("show me all my notes").await;
    assert_eq!(res, OperationResult::message(MSG_NO_NOTES));
    assert!(tmp.path().join("notes").is_dir());
}

#[tokio::test]
async fn listing_contains_each_title_once() {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("notes");

    for (title, content) in [("Groceries", "milk"), ("Trip Plan", "pack"), ("groceries.TXT", "eggs")] {
        let reply = format!(r#"{{"action":"create","title":"{title}","content":"{content}"}}"#);
        let res = canned_agent(&tmp, &reply).handle("note it").await;
        assert_eq!(res.message, MSG_CREATED);
    }

    let res = canned_agent(&tmp, r#"{"action":"list"}"#).handle("list").await;
    assert_eq!(res.message.matches("groceries").count(), 1);
    assert_eq!(res.message.matches("trip_plan").count(), 1);

    // Second create under the same normalized title replaced the first.
    assert_eq!(fs::read_to_string(notes.join("groceries.txt")).unwrap(), "eggs");
}

#[tokio::test]
async fn read_missing_note_reports_filename() {
    let tmp = TempDir::new().unwrap();
    let res = keyword_agent(&tmp).handle("open the note Holiday Ideas").await;
    assert_eq!(res.message, "Note not found: holiday_ideas.txt");
    assert!(res.filename.is_none());
}

#[tokio::test]
async fn create_without_content_is_invalid_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let agent = canned_agent(&tmp, r#"{"action":"create","title":"Empty","content":null}"#);

    let res = agent.handle("make a note called empty").await;
    assert_eq!(res, OperationResult::message(MSG_INVALID_REQUEST));
    assert!(!tmp.path().join("notes").exists());
}

#[tokio::test]
async fn explicit_base_dir_is_honoured() {
    let tmp = TempDir::new().unwrap();
    let other = tmp.path().join("elsewhere");
    let agent = keyword_agent(&tmp);

    let res = agent.handle_request("note: pick up dry cleaning", &other).await;
    assert_eq!(res.filename.as_deref(), Some("pick_up_dry_cleaning.txt"));
    assert_eq!(
        fs::read_to_string(other.join("pick_up_dry_cleaning.txt")).unwrap(),
        "pick up dry cleaning"
    );
}

#[tokio::test]
async fn content_round_trips_byte_for_byte() {
    let tmp = TempDir::new().unwrap();
    let body = "Line 1\n\tindented — ünïcode ✓\n\nlast line without newline";
    let reply = serde_json::json!({ "action": "create", "title": "Round Trip", "content": body }).to_string();

    canned_agent(&tmp, &reply).handle("store it").await;
    let read = canned_agent(&tmp, r#"{"action":"read","title":"round trip"}"#)
        .handle("read it")
        .await;
    assert_eq!(read.message, format!("Note content: {body}"));
}
