//! Headless TetrECS runner (default binary).
//!
//! Reads text commands from stdin (`place 2 3`, `rotate`, `swap`, `left`, `drop`,
//! `quit`, ...), writes every notification to stdout as one JSON object per line
//! and merges the final score into the high-score file. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tetrecs::core::ScoreLedger;
use tetrecs::engine::{GameConfig, GameSummary};
use tetrecs::session::{session, SessionHandle};
use tetrecs::types::Command;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let result = rt.block_on(run());

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_background();
    result
}

async fn run() -> Result<()> {
    let config = GameConfig::from_env();
    let scores_path = std::env::var("TETRECS_SCORES_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("scores.txt"));
    let player = std::env::var("TETRECS_PLAYER")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "player".to_string());

    let mut ledger = load_scores(&scores_path).await?;
    let best = ledger.clone();

    let (notes_tx, mut notes_rx) = mpsc::unbounded_channel();
    let (handle, session) = session(config, notes_tx);
    let session = session.with_high_score(move |score| best.beats_best(score));

    let printer = tokio::spawn(async move {
        while let Some(note) = notes_rx.recv().await {
            match serde_json::to_string(&note) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "failed to encode notification"),
            }
        }
    });
    tokio::spawn(read_commands(handle));

    let summary = session.run_local().await?;
    printer.await.context("notification printer panicked")?;

    record_score(&mut ledger, &scores_path, &player, &summary).await
}

async fn read_commands(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = Command::from_str(&line) else {
                    warn!(line = %line, "unknown command");
                    continue;
                };
                if !handle.command(command) {
                    break;
                }
            }
            Ok(None) => {
                info!("stdin closed, stopping");
                handle.stop();
                break;
            }
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                handle.stop();
                break;
            }
        }
    }
}

async fn load_scores(path: &Path) -> Result<ScoreLedger> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text
            .parse::<ScoreLedger>()
            .with_context(|| format!("malformed high-score file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ScoreLedger::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn record_score(
    ledger: &mut ScoreLedger,
    path: &Path,
    player: &str,
    summary: &GameSummary,
) -> Result<()> {
    if ledger.beats_best(summary.score) {
        info!(score = summary.score, "new high score");
    }
    ledger.insert(player, summary.score);

    tokio::fs::write(path, ledger.render())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        score = summary.score,
        level = summary.level,
        path = %path.display(),
        "score recorded"
    );
    Ok(())
}
