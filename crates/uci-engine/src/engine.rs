//! UCI engine process wrapper.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use thiserror::Error;
use tracing::debug;

use crate::limits::SearchLimits;
use crate::suggested::SuggestedMove;

/// Maximum number of lines to read during protocol synchronization
/// before giving up. Keeps a non-UCI process from hanging the handshake.
pub const MAX_UCI_LINES: usize = 1000;

/// Errors that can occur when talking to a UCI engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine executable was not found at the given path.
    #[error("engine not found: {0}")]
    NotFound(String),
    /// I/O failure spawning or talking to the engine process.
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The UCI handshake did not complete.
    #[error("engine initialization failed")]
    InitFailed,
    /// The engine sent something the adapter cannot use.
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
    /// The engine closed its output stream.
    #[error("engine closed unexpectedly")]
    Closed,
}

/// A UCI engine process answering best-move queries.
///
/// # Lifecycle
///
/// 1. [`UciEngine::spawn`] starts the process and completes the
///    `uci`/`uciok` handshake.
/// 2. [`UciEngine::best_move`] runs one search per call; `&mut self`
///    keeps requests strictly sequential.
/// 3. [`UciEngine::shutdown`] terminates the process. Idempotent; the
///    [`Drop`] implementation kills the process as a backstop.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    name: String,
    disposed: bool,
}

impl UciEngine {
    /// Spawns the engine executable and performs the UCI handshake.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the executable does not exist
    /// - [`EngineError::Io`] if the process cannot be spawned
    /// - [`EngineError::InitFailed`] / [`EngineError::Closed`] if the
    ///   handshake does not complete
    pub async fn spawn(path: &str) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::NotFound(path.to_string())
                } else {
                    EngineError::Io(e)
                }
            })?;

        let stdin = process.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = BufReader::new(process.stdout.take().ok_or(EngineError::InitFailed)?);

        let mut engine = Self {
            process,
            stdin,
            stdout,
            name: String::new(),
            disposed: false,
        };
        engine.init().await?;
        Ok(engine)
    }

    /// Sends `uci`, captures the engine name, waits for `uciok`.
    async fn init(&mut self) -> Result<(), EngineError> {
        self.send("uci").await?;
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            let line = self.read_line().await?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.to_string();
            } else if line == "uciok" {
                break;
            }
        }
        if self.name.is_empty() {
            self.name = "Unknown Engine".to_string();
        }
        Ok(())
    }

    /// The engine's name as reported during the handshake.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asks the engine for its best move in the given position.
    ///
    /// Each call resets the engine for a fresh search: `ucinewgame`,
    /// hash clear, analysis mode, a readiness round-trip, then the
    /// position and a search bounded by `limits`. Lines before
    /// `bestmove` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if called after [`UciEngine::shutdown`]; that is a caller
    /// bug, not a recoverable condition.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine exits mid-search,
    /// or [`EngineError::InvalidResponse`] if the `bestmove` line does
    /// not carry a usable move.
    pub async fn best_move(
        &mut self,
        fen: &str,
        limits: &SearchLimits,
    ) -> Result<SuggestedMove, EngineError> {
        assert!(!self.disposed, "best_move called after shutdown");

        self.send("ucinewgame").await?;
        self.send("setoption name Clear Hash").await?;
        self.send("setoption name UCI_AnalyseMode value true").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await?;
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!(
            "go depth {} movetime {}",
            limits.depth(),
            limits.movetime_ms()
        ))
        .await?;

        loop {
            let line = self.read_line().await?;
            if let Some(rest) = line.strip_prefix("bestmove") {
                let token = rest
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| EngineError::InvalidResponse(line.clone()))?;
                return token.parse();
            }
        }
    }

    /// Terminates the engine process. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let _ = self.send("quit").await;
        let _ = self.process.kill().await;
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "engine <");
        self.stdin.write_all(cmd.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Reads lines until `expected` appears, bounded by [`MAX_UCI_LINES`].
    async fn wait_for(&mut self, expected: &str) -> Result<(), EngineError> {
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            if self.read_line().await? == expected {
                return Ok(());
            }
        }
    }

    async fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let bytes = self.stdout.read_line(&mut line).await?;
        if bytes == 0 {
            return Err(EngineError::Closed);
        }
        let line = line.trim().to_string();
        debug!(line = line.as_str(), "engine >");
        Ok(line)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if !self.disposed {
            let _ = self.process.start_kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_nonexistent_executable() {
        let result = UciEngine::spawn("/nonexistent/path/to/engine").await;
        match result {
            Err(EngineError::NotFound(path)) => {
                assert_eq!(path, "/nonexistent/path/to/engine");
            }
            other => panic!("expected NotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_engine_error_display() {
        let not_found = EngineError::NotFound("/path/to/engine".to_string());
        assert!(not_found.to_string().contains("/path/to/engine"));

        assert_eq!(
            EngineError::InitFailed.to_string(),
            "engine initialization failed"
        );

        let invalid = EngineError::InvalidResponse("bestmove".to_string());
        assert!(invalid.to_string().contains("bestmove"));

        assert_eq!(EngineError::Closed.to_string(), "engine closed unexpectedly");
    }
}
