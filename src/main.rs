//! noteflow — note keeper entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse flags
//!   3. Load config, apply `--notes-dir`
//!   4. Init logger at configured level
//!   5. Build the agent
//!   6. Run one request from the arguments, or the interactive console

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::info;

use noteflow::agent::NoteAgent;
use noteflow::error::AppError;
use noteflow::{config, console, logger};

const USAGE: &str = "\
noteflow — keep notes by asking in plain language

Usage:
  noteflow [--config <path>] [--notes-dir <path>] [request...]

With a request, handle it once and exit. Without one, start the console.

Flags:
  --config <path>      config file (default: config/default.toml if present)
  --notes-dir <path>   directory holding the notes (overrides [notes].dir)
  --help, -h           print this help

Examples:
  noteflow take a note about the meeting tomorrow
  noteflow list my notes
";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    notes_dir: Option<PathBuf>,
    request: Vec<String>,
}

/// Returns `None` when help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>, AppError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--config" => parsed.config = Some(flag_value(&mut args, "--config")?),
            "--notes-dir" => parsed.notes_dir = Some(flag_value(&mut args, "--notes-dir")?),
            "--" => {
                parsed.request.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                return Err(AppError::Usage(format!("unknown flag: {flag}")));
            }
            _ => parsed.request.push(arg),
        }
    }
    Ok(Some(parsed))
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf, AppError> {
    args.next()
        .map(PathBuf::from)
        .ok_or_else(|| AppError::Usage(format!("{flag} needs a value")))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        print!("{USAGE}");
        return Ok(());
    };

    let mut config = config::load(args.config.as_deref())?;
    if let Some(dir) = args.notes_dir {
        config.notes_dir = dir;
    }

    logger::init(&config.log_level, config.log_file.as_deref())?;

    info!(
        provider = %config.llm.provider,
        notes_dir = %config.notes_dir.display(),
        log_level = %config.log_level,
        "config loaded"
    );

    let agent = NoteAgent::from_config(&config)?;

    if !args.request.is_empty() {
        let result = agent.handle(&args.request.join(" ")).await;
        println!("{}", console::render(&result));
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    console::run(&agent, shutdown).await;
    Ok(())
}
