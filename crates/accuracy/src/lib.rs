//! Move-match accuracy scoring.
//!
//! Steps through a parsed game record one move at a time, asks a UCI
//! engine for its best move in each evaluated position, and counts how
//! often the played move reaches the same position as the engine's
//! choice. The result is a per-side agreement percentage.
//!
//! # Overview
//!
//! - [`Analyzer`] - the session manager and driver loop
//! - [`AnalysisConfig`] / [`SideFilter`] - what to search and for whom
//! - [`GameBoard`] - the live position, backed by shakmaty
//! - [`Engine`] - the best-move seam; [`uci_engine::UciEngine`]
//!   implements it in production
//! - [`ProgressSink`] / [`AccuracyReport`] - observer and final result
//!
//! # Example
//!
//! ```ignore
//! use accuracy::{AnalysisConfig, Analyzer, NullSink};
//! use uci_engine::UciEngine;
//!
//! let engine = UciEngine::spawn("stockfish").await?;
//! let analyzer = Analyzer::new();
//! let report = analyzer
//!     .analyze(&pgn_text, &AnalysisConfig::default(), engine, &mut NullSink)
//!     .await?;
//! println!("white: {:.1} %", report.white_percent);
//! ```

pub mod board;
pub mod driver;
pub mod progress;

pub use board::{BoardError, GameBoard};
pub use driver::{AnalysisConfig, AnalysisError, Analyzer, Engine, SideFilter};
pub use progress::{AccuracyReport, NullSink, ProgressSink, ProgressUpdate, RunStatus};
