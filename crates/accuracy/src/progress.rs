//! Progress reporting and the final accuracy report.

use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every move was stepped through.
    Completed,
    /// A stop request was honored at a step boundary.
    Cancelled,
}

/// A step-boundary progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    /// Whole-number percentage of steps taken, 0 before the first move
    /// and 100 once every move has been stepped through.
    pub percent: u32,
    /// The move being worked on, 1-based, capped at `total`.
    pub current: usize,
    /// Total number of moves in the record.
    pub total: usize,
}

impl ProgressUpdate {
    /// The snapshot for `cursor` moves done out of `total`.
    pub fn at(cursor: usize, total: usize) -> Self {
        Self {
            percent: (100.0 * cursor as f64 / total as f64).round() as u32,
            current: (cursor + 1).min(total),
            total,
        }
    }
}

/// Per-side agreement counts and percentages.
///
/// Percentages divide by half the total move count; with an odd number
/// of moves this slightly misattributes the last half-move, an accepted
/// approximation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// Moves where white's choice matched the engine's.
    pub white_matched: u32,
    /// Moves where black's choice matched the engine's.
    pub black_matched: u32,
    /// Total number of moves in the record (both sides).
    pub total_moves: usize,
    /// White agreement percentage.
    pub white_percent: f64,
    /// Black agreement percentage.
    pub black_percent: f64,
    /// Whether the run completed or was cancelled.
    pub status: RunStatus,
}

impl AccuracyReport {
    pub(crate) fn new(
        white_matched: u32,
        black_matched: u32,
        total_moves: usize,
        status: RunStatus,
    ) -> Self {
        let half = total_moves as f64 / 2.0;
        Self {
            white_matched,
            black_matched,
            total_moves,
            white_percent: 100.0 * f64::from(white_matched) / half,
            black_percent: 100.0 * f64::from(black_matched) / half,
            status,
        }
    }
}

/// Observer for a running analysis.
///
/// [`on_progress`](Self::on_progress) fires at every step boundary;
/// [`on_finished`](Self::on_finished) fires once when the run completes
/// or is cancelled (not when it fails).
pub trait ProgressSink {
    fn on_progress(&mut self, update: &ProgressUpdate);
    fn on_finished(&mut self, report: &AccuracyReport);
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&mut self, _update: &ProgressUpdate) {}
    fn on_finished(&mut self, _report: &AccuracyReport) {}
}
