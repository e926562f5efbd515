//! Command-line front end for move-match accuracy analysis.
//!
//! Reads a game record, drives a UCI engine over every evaluated move
//! and prints per-side agreement. Ctrl-C stops the run at the next move
//! boundary and reports the partial counts.

mod config;
mod report;

use std::io::Write;
use std::path::PathBuf;

use accuracy::{
    AccuracyReport, AnalysisConfig, Analyzer, ProgressSink, ProgressUpdate, RunStatus, SideFilter,
};
use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use uci_engine::UciEngine;

#[derive(Parser)]
#[command(name = "accuracy")]
#[command(about = "Scores how often the played moves match a UCI engine's choice")]
struct Args {
    /// Path to the game record (PGN)
    pgn: PathBuf,

    /// Search depth per position (clamped to 1-32)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Time budget per position in milliseconds (clamped to 1000-64000)
    #[arg(short, long)]
    movetime: Option<u64>,

    /// Which side's moves to evaluate
    #[arg(short, long, value_enum, default_value_t = SideArg::Both)]
    side: SideArg,

    /// Path to the UCI engine executable (overrides accuracy.toml)
    #[arg(long)]
    engine: Option<String>,

    /// Write the final report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SideArg {
    White,
    Black,
    Both,
}

impl From<SideArg> for SideFilter {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => SideFilter::White,
            SideArg::Black => SideFilter::Black,
            SideArg::Both => SideFilter::Both,
        }
    }
}

/// Prints progress on one line and the final counters below it.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        print!(
            "\r{} % ({}/{})",
            update.percent, update.current, update.total
        );
        let _ = std::io::stdout().flush();
    }

    fn on_finished(&mut self, report: &AccuracyReport) {
        println!();
        match report.status {
            RunStatus::Completed => {
                println!(
                    "White: {} ({:.1} %)",
                    report.white_matched, report.white_percent
                );
                println!(
                    "Black: {} ({:.1} %)",
                    report.black_matched, report.black_percent
                );
            }
            RunStatus::Cancelled => {
                println!("interrupted");
                println!("White: {} ...", report.white_matched);
                println!("Black: {} ...", report.black_matched);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = CliConfig::load().unwrap_or_default();

    let raw = std::fs::read_to_string(&args.pgn)
        .with_context(|| format!("failed to read {}", args.pgn.display()))?;

    let analysis = AnalysisConfig {
        depth: args.depth.unwrap_or(config.depth),
        movetime_ms: args.movetime.unwrap_or(config.movetime_ms),
        sides: args.side.into(),
    };
    let engine_path = args.engine.unwrap_or(config.engine_path);

    let engine = UciEngine::spawn(&engine_path)
        .await
        .with_context(|| format!("failed to start engine '{engine_path}'"))?;
    let engine_name = engine.name().to_string();
    println!("Engine: {engine_name}");

    let analyzer = Analyzer::new();
    let stopper = analyzer.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("stop requested, finishing the current move");
            stopper.request_stop();
        }
    });

    let report = analyzer
        .analyze(&raw, &analysis, engine, &mut ConsoleProgress)
        .await?;

    if let Some(path) = &args.json {
        let game = args.pgn.display().to_string();
        report::write_json(path, &game, &engine_name, &report)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
