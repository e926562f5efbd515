//! Integration tests for the UCI engine adapter.
//!
//! Most tests drive a scripted shell-script engine so they run without
//! any real chess engine installed. The last test talks to a real
//! Stockfish and is ignored by default:
//! `cargo test -p uci-engine --test fake_engine -- --ignored`

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use uci_engine::{EngineError, SearchLimits, UciEngine};

/// Writes an executable shell script that speaks just enough UCI.
///
/// `bestmove_line` is echoed verbatim in response to any `go` command.
fn script_engine(dir: &tempfile::TempDir, bestmove_line: &str) -> PathBuf {
    let path = dir.path().join("fake-engine.sh");
    let script = format!(
        r#"#!/bin/sh
while read line; do
  case "$line" in
    uci)
      echo "id name FakeFish"
      echo "id author nobody"
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    go*)
      echo "info depth 1 score cp 13 nodes 42 pv e2e4"
      echo "{bestmove_line}"
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#
    );
    std::fs::write(&path, script).expect("write fake engine script");
    let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}

#[tokio::test]
async fn test_handshake_reports_engine_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_engine(&dir, "bestmove e2e4");

    let mut engine = UciEngine::spawn(path.to_str().unwrap())
        .await
        .expect("spawn fake engine");
    assert_eq!(engine.name(), "FakeFish");
    engine.shutdown().await;
}

#[tokio::test]
async fn test_best_move_ignores_info_chatter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_engine(&dir, "bestmove e7e8q ponder e8f7");

    let mut engine = UciEngine::spawn(path.to_str().unwrap())
        .await
        .expect("spawn fake engine");
    let limits = SearchLimits::new(5, 1_000);
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    let suggested = engine.best_move(fen, &limits).await.expect("best move");
    assert_eq!(suggested.from, "e7");
    assert_eq!(suggested.to, "e8");
    assert_eq!(suggested.promotion, Some('q'));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_bad_bestmove_is_invalid_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_engine(&dir, "bestmove (none)");

    let mut engine = UciEngine::spawn(path.to_str().unwrap())
        .await
        .expect("spawn fake engine");
    let limits = SearchLimits::default();
    let result = engine.best_move("8/8/8/8/8/8/8/8 w - - 0 1", &limits).await;
    assert!(matches!(result, Err(EngineError::InvalidResponse(_))));
    engine.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = script_engine(&dir, "bestmove e2e4");

    let mut engine = UciEngine::spawn(path.to_str().unwrap())
        .await
        .expect("spawn fake engine");
    engine.shutdown().await;
    engine.shutdown().await;
}

/// Check if Stockfish is available in PATH.
fn stockfish_available() -> bool {
    std::process::Command::new("stockfish")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn test_real_stockfish_best_move() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let mut engine = UciEngine::spawn("stockfish").await.expect("spawn stockfish");
    let limits = SearchLimits::new(8, 1_000);
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    let suggested = engine
        .best_move(fen, &limits)
        .await
        .expect("stockfish best move");
    assert!(!suggested.from.is_empty());
    assert!(!suggested.to.is_empty());

    engine.shutdown().await;
}
