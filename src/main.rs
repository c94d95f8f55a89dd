//! Todoist to Everdo exporter - Main Entry Point
//!
//! Parses the command line, sets up logging on stderr and hands over to
//! `todoist_everdo::run_export`.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use todoist_everdo::{Config, ExportClock, Output, Snapshot, run_export};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Export a Todoist account snapshot as an Everdo import file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file, or '-' for stdout
    out: String,

    /// JSON snapshot of the Todoist account
    #[arg(long)]
    snapshot: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the inbox project (overrides the configuration file)
    #[arg(long)]
    inbox_project: Option<String>,

    /// Label marking waiting items (overrides the configuration file)
    #[arg(long)]
    waiting_label: Option<String>,
}

fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout may carry the document, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todoist_everdo=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Without --config the defaults apply; a named file must exist
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(inbox) = args.inbox_project {
        config.inbox_project = inbox;
    }
    if let Some(label) = args.waiting_label {
        config.waiting_label = label;
    }

    let snapshot = Snapshot::load(&args.snapshot)?;
    tracing::info!(
        "Loaded {} projects, {} items, {} labels and {} notes",
        snapshot.projects().len(),
        snapshot.items().len(),
        snapshot.labels().len(),
        snapshot.notes().len()
    );

    let clock = ExportClock::system();
    tracing::info!("Export day is {}", clock.now().date_naive());
    let output = Output::parse(&args.out);
    let summary = run_export(&snapshot, &config, clock, &output)?;
    for line in summary.to_string().lines() {
        tracing::info!("{}", line);
    }
    Ok(())
}
