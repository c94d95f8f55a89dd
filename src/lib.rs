//! Todoist to Everdo exporter
//!
//! Reads a snapshot of a Todoist account and writes an Everdo import file
//! (JSON with `items` and `tags`), mapping the Todoist project hierarchy onto
//! Everdo's areas, projects, actions and notebooks.
//!
//! # Architecture
//!
//! - **Source**: `source` module - snapshot of projects, items, labels and notes
//! - **Policy**: `classify` and `builder` - GTD placement rules and entity construction
//! - **Target**: `everdo` module - items, tags, cross-reference and the JSON writer
//! - **Driver**: `export` module - runs the passes and collects the summary
//!
//! # Example
//!
//! ```no_run
//! use todoist_everdo::{Config, ExportClock, Output, Snapshot, run_export};
//!
//! fn main() -> anyhow::Result<()> {
//!     let snapshot = Snapshot::load("todoist.json")?;
//!     let config = Config::load("todoist-everdo.toml")?;
//!     let output = Output::parse("everdo.json");
//!     let summary = run_export(&snapshot, &config, ExportClock::system(), &output)?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod everdo;
pub mod export;
pub mod source;
pub mod timestamp;

use anyhow::{Context, Result};
use std::path::PathBuf;

// Re-export commonly used types
pub use config::Config;
pub use error::ExportError;
pub use everdo::{EverdoFile, EverdoId, EverdoItem, EverdoTag, ItemType, ListType, TagType};
pub use export::{ExportSummary, Exporter};
pub use source::Snapshot;
pub use timestamp::ExportClock;

/// Where the finished document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// `-` means stdout, anything else is a file path
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Output::Stdout
        } else {
            Output::File(PathBuf::from(arg))
        }
    }
}

/// Export a snapshot and write the result
///
/// Nothing is written unless every pass succeeds.
///
/// # Arguments
/// * `snapshot` - Source account data
/// * `config` - Project names and label rules
/// * `clock` - Source of the export day
/// * `output` - Destination of the JSON document
///
/// # Returns
/// Counts of what was exported and skipped
pub fn run_export(
    snapshot: &Snapshot,
    config: &Config,
    clock: ExportClock,
    output: &Output,
) -> Result<ExportSummary> {
    let (file, summary) = Exporter::new(snapshot, config, clock)
        .run()
        .context("Export failed")?;

    match output {
        Output::Stdout => file
            .write_to(std::io::stdout().lock())
            .context("Failed to write export to stdout")?,
        Output::File(path) => file
            .export(path)
            .with_context(|| format!("Failed to write export to {}", path.display()))?,
    }
    Ok(summary)
}
