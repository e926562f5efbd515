//! Asynchronous UCI engine adapter.
//!
//! Wraps a UCI-compatible engine process (such as Stockfish) behind a
//! narrow best-move contract: hand it a position, get back the engine's
//! suggested move in coordinate form. One request is outstanding at a
//! time; intermediate `info` chatter is ignored.
//!
//! # Example
//!
//! ```ignore
//! use uci_engine::{SearchLimits, UciEngine};
//!
//! let mut engine = UciEngine::spawn("stockfish").await?;
//! let limits = SearchLimits::new(12, 2000);
//! let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
//! let suggested = engine.best_move(fen, &limits).await?;
//! println!("{}", suggested);
//! engine.shutdown().await;
//! ```

mod engine;
mod limits;
mod suggested;

pub use engine::{EngineError, UciEngine, MAX_UCI_LINES};
pub use limits::SearchLimits;
pub use suggested::SuggestedMove;
