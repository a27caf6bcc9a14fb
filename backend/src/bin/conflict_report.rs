//! Conflict report for a planner snapshot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin flexwise-conflicts --features cli -- snapshot.json
//! cargo run --bin flexwise-conflicts --features cli -- snapshot.json --ignore "room_double_booking:r1:1|p1"
//! ```
//!
//! Prints `{ "conflicts": [...], "summary": {...} }` to stdout. Exits with
//! status 2 when error-severity conflicts remain after `--ignore`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::collections::HashSet;
use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use flexwise_scheduler::algorithms::{detect_conflicts, has_blocking_conflicts, ConflictSummary};
use flexwise_scheduler::models::{Conflict, ConflictId};
use flexwise_scheduler::parsing::parse_snapshot_file;

#[derive(Serialize)]
struct Report<'a> {
    conflicts: &'a [Conflict],
    summary: ConflictSummary,
}

struct Args {
    snapshot: String,
    ignored: HashSet<ConflictId>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut snapshot = None;
    let mut ignored = HashSet::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ignore" => {
                let id = args.next().context("--ignore needs a conflict id")?;
                ignored.insert(ConflictId::from(id));
            }
            _ if snapshot.is_none() => snapshot = Some(arg),
            other => bail!("Unexpected argument: {}", other),
        }
    }
    let snapshot =
        snapshot.context("Usage: flexwise-conflicts <snapshot.json> [--ignore <id>]...")?;
    Ok(Args { snapshot, ignored })
}

fn main() -> anyhow::Result<ExitCode> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let snapshot = parse_snapshot_file(&args.snapshot)?;
    info!(
        "Loaded {} entries from {}",
        snapshot.entries.len(),
        args.snapshot
    );

    let conflicts = detect_conflicts(&snapshot.entries, &snapshot.references);
    let summary = ConflictSummary::from_conflicts(&conflicts);
    info!(
        "Found {} conflict(s): {} error(s), {} warning(s)",
        summary.total, summary.errors, summary.warnings
    );

    let report = Report {
        conflicts: &conflicts,
        summary,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if has_blocking_conflicts(&conflicts, &args.ignored) {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
