//! Line-oriented driver over the player runtime.
//!
//! Reads one command per line from stdin and prints one JSON response per
//! line to stdout. Records live in memory for the lifetime of the process.
mod command;

use std::path::PathBuf;

use anyhow::Result;
use game_core::GameError;
use runtime::{Runtime, RuntimeConfig, RuntimeError};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use command::Command;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = setup_logging()?;

    let config = RuntimeConfig::from_env();
    let runtime = Runtime::builder().config(config).build();
    tracing::info!(guard = runtime.guard_name(), "reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let response = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(&runtime, command).await,
            Err(message) => json!({ "error": "BAD_COMMAND", "message": message }),
        };
        stdout
            .write_all(format!("{}\n", response).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn execute(runtime: &Runtime, command: Command) -> Value {
    let result = match command {
        Command::Register => runtime.register().await.map(|r| json!(r)),
        Command::Loot { token, point } => runtime.loot(&token, &point).await.map(|r| json!(r)),
        Command::Attack {
            actor,
            target,
            part,
        } => runtime
            .attack(&actor, &target, &part)
            .await
            .map(|r| json!(r)),
        Command::Evacuate { token } => runtime.evacuate(&token).await.map(|r| json!(r)),
        Command::Show { token } => runtime.player(&token).await.map(|r| json!(r)),
        Command::Quit => return Value::Null,
    };

    result.unwrap_or_else(|err| error_body(&err))
}

fn error_body(err: &RuntimeError) -> Value {
    json!({
        "error": err.error_code(),
        "kind": err.kind().to_string(),
        "severity": err.severity().as_str(),
        "retryable": err.is_retryable(),
        "message": err.to_string(),
    })
}

/// Logs go to stderr, and additionally to `$RAID_LOG_DIR/raid.log` when set.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn setup_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var_os("RAID_LOG_DIR").map(PathBuf::from) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(&dir, "raid.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
