//! The analysis driver: steps through a game, one engine query per
//! evaluated move, and tallies agreement per side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shakmaty::Color;
use thiserror::Error;
use tracing::debug;

use game_record::{GameRecord, ParseError};
use uci_engine::{EngineError, SearchLimits, SuggestedMove, UciEngine};

use crate::board::{BoardError, GameBoard};
use crate::progress::{AccuracyReport, ProgressSink, ProgressUpdate, RunStatus};

/// Which side's moves are checked against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideFilter {
    White,
    Black,
    Both,
}

impl SideFilter {
    /// Whether moves by `color` are evaluated.
    pub fn includes(self, color: Color) -> bool {
        match self {
            SideFilter::White => color == Color::White,
            SideFilter::Black => color == Color::Black,
            SideFilter::Both => true,
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Search depth per position; clamped to `[1, 32]`.
    pub depth: u32,
    /// Time budget per position in milliseconds; clamped to `[1000, 64000]`.
    pub movetime_ms: u64,
    /// Which side's moves to evaluate.
    pub sides: SideFilter,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 15,
            movetime_ms: 2_000,
            sides: SideFilter::Both,
        }
    }
}

/// Errors that end (or refuse to start) an analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The game record could not be parsed.
    #[error("invalid game record: {0}")]
    Parse(#[from] ParseError),
    /// Another run is active on this analyzer.
    #[error("an analysis is already running")]
    AlreadyRunning,
    /// A played move is illegal in its position; the record is corrupt
    /// or does not belong to its starting position.
    #[error("illegal move '{mv}' at index {index}")]
    IllegalMove {
        mv: String,
        index: usize,
        #[source]
        source: BoardError,
    },
    /// The engine failed or went away.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    /// The starting position or an engine-suggested move was rejected
    /// by the rules.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Anything that can answer best-move queries for the driver.
///
/// [`UciEngine`] is the production implementation; tests script their
/// own. `shutdown` must be safe to call exactly once per run, on every
/// terminal path.
#[allow(async_fn_in_trait)]
pub trait Engine {
    async fn best_move(
        &mut self,
        fen: &str,
        limits: &SearchLimits,
    ) -> Result<SuggestedMove, EngineError>;

    async fn shutdown(&mut self);
}

impl Engine for UciEngine {
    async fn best_move(
        &mut self,
        fen: &str,
        limits: &SearchLimits,
    ) -> Result<SuggestedMove, EngineError> {
        UciEngine::best_move(self, fen, limits).await
    }

    async fn shutdown(&mut self) {
        UciEngine::shutdown(self).await;
    }
}

/// Clears the running flag when a session ends, whichever way it ends.
struct SessionSlot(Arc<AtomicBool>);

impl Drop for SessionSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The analysis session manager.
///
/// One `Analyzer` holds one analysis slot: [`analyze`](Self::analyze)
/// rejects a start while a run is active. Clones share the slot and the
/// stop flag, so a clone handed to a signal handler can stop the run.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Flags the active run to stop at its next step boundary.
    ///
    /// Advisory: a step in flight finishes first, and a stuck engine
    /// call is not interrupted. Returns `true` if a run was active and
    /// is now flagged, `false` if nothing was running.
    pub fn request_stop(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.stop.store(true, Ordering::SeqCst);
        true
    }

    /// Runs a full analysis of `raw` with the given engine.
    ///
    /// Parses the record, seeds the board (from a `FEN` header if one
    /// is present), then steps through the moves: each evaluated move
    /// costs one engine round-trip, compares the engine's choice with
    /// the played move by resulting position, and credits the mover on
    /// a match. `progress` is notified at every step boundary and once
    /// at the end.
    ///
    /// The engine is taken by value and released exactly once on every
    /// return path, including rejected starts.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Parse`] for an empty or unusable record
    /// - [`AnalysisError::AlreadyRunning`] while another run is active
    /// - [`AnalysisError::IllegalMove`] if a played move does not fit
    ///   its position (fatal; the run is not resumed)
    /// - [`AnalysisError::Engine`] if the engine fails
    pub async fn analyze<E: Engine, P: ProgressSink + ?Sized>(
        &self,
        raw: &str,
        config: &AnalysisConfig,
        mut engine: E,
        progress: &mut P,
    ) -> Result<AccuracyReport, AnalysisError> {
        let result = self.run_session(raw, config, &mut engine, progress).await;
        engine.shutdown().await;
        result
    }

    async fn run_session<E: Engine, P: ProgressSink + ?Sized>(
        &self,
        raw: &str,
        config: &AnalysisConfig,
        engine: &mut E,
        progress: &mut P,
    ) -> Result<AccuracyReport, AnalysisError> {
        let record = GameRecord::parse(raw)?;
        let board = match record.headers.get("FEN") {
            Some(fen) => GameBoard::from_fen(fen)?,
            None => GameBoard::startpos(),
        };

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AnalysisError::AlreadyRunning);
        }
        let _slot = SessionSlot(Arc::clone(&self.running));
        self.stop.store(false, Ordering::SeqCst);

        self.drive(&record, config, board, engine, progress).await
    }

    async fn drive<E: Engine, P: ProgressSink + ?Sized>(
        &self,
        record: &GameRecord,
        config: &AnalysisConfig,
        mut board: GameBoard,
        engine: &mut E,
        progress: &mut P,
    ) -> Result<AccuracyReport, AnalysisError> {
        let limits = SearchLimits::new(config.depth, config.movetime_ms);
        let total = record.moves.len();
        let mut white_matched = 0u32;
        let mut black_matched = 0u32;

        for (cursor, token) in record.moves.iter().enumerate() {
            // Stop requests are honored before anything else is done
            // for this step, in particular before any engine query.
            if self.stop.load(Ordering::SeqCst) {
                debug!(cursor, "analysis cancelled");
                let report =
                    AccuracyReport::new(white_matched, black_matched, total, RunStatus::Cancelled);
                progress.on_finished(&report);
                return Ok(report);
            }
            progress.on_progress(&ProgressUpdate::at(cursor, total));

            if !config.sides.includes(board.turn()) {
                // Not a side under evaluation: play the move and move on.
                play_recorded(&mut board, token, cursor)?;
                continue;
            }

            let suggested = engine.best_move(&board.fen(), &limits).await?;

            // Probe the engine's choice for its resulting encoding,
            // then play the recorded move for real.
            board.play_suggested(&suggested)?;
            let predicted = board.fen();
            board.undo();

            play_recorded(&mut board, token, cursor)?;
            let played = board.fen();

            // Compare positions, not move text: differently written
            // moves that land on the same position still agree.
            if predicted == played {
                // The move is already on the board, so the mover is the
                // one whose turn it no longer is.
                match board.turn() {
                    Color::Black => white_matched += 1,
                    Color::White => black_matched += 1,
                }
            }
        }

        progress.on_progress(&ProgressUpdate::at(total, total));
        let report = AccuracyReport::new(white_matched, black_matched, total, RunStatus::Completed);
        progress.on_finished(&report);
        Ok(report)
    }
}

fn play_recorded(board: &mut GameBoard, token: &str, cursor: usize) -> Result<(), AnalysisError> {
    board
        .play_san(token)
        .map_err(|source| AnalysisError::IllegalMove {
            mv: token.to_string(),
            index: cursor,
            source,
        })
}
