//! Interactive console — reads requests from stdin line by line, prints each
//! reply to stdout. Runs until stdin closes or `shutdown` is cancelled.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::agent::NoteAgent;
use crate::notes::OperationResult;

/// Text shown to the user for one result.
pub fn render(result: &OperationResult) -> String {
    match &result.filename {
        Some(filename) => format!("{}\n  file: {filename}", result.message),
        None => result.message.clone(),
    }
}

pub async fn run(agent: &NoteAgent, shutdown: CancellationToken) {
    info!(
        notes_dir = %agent.storage().base_dir().display(),
        "console started (Ctrl-C to quit)"
    );
    println!("─────────────────────────────────");
    println!(" noteflow  (Ctrl-C to quit)");
    println!("─────────────────────────────────");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("stdin read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if input.is_empty() {
                            continue;
                        }
                        debug!(%input, "console received line");
                        let result = agent.handle(input).await;
                        println!("{}", render(&result));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_appends_filename() {
        let r = OperationResult::with_file("Note created successfully", "a.txt");
        assert_eq!(render(&r), "Note created successfully\n  file: a.txt");
    }

    #[test]
    fn render_message_only() {
        let r = OperationResult::message("No notes found");
        assert_eq!(render(&r), "No notes found");
    }
}
