//! JSON report file generation.

use accuracy::AccuracyReport;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

/// JSON representation of a finished run.
#[derive(Serialize)]
struct ReportJson<'a> {
    /// Name of the game record file that was analyzed.
    game: &'a str,
    /// Name of the engine the moves were compared against.
    engine: &'a str,
    /// The accuracy result itself.
    #[serde(flatten)]
    report: &'a AccuracyReport,
    /// ISO 8601 timestamp when the file was created.
    created_at: String,
}

/// Writes the final report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written, or if
/// serialization fails (which it does not for these types).
pub fn write_json<P: AsRef<Path>>(
    path: P,
    game: &str,
    engine: &str,
    report: &AccuracyReport,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&ReportJson {
        game,
        engine,
        report,
        created_at: Utc::now().to_rfc3339(),
    })?;
    std::fs::write(path, json)?;
    Ok(())
}
