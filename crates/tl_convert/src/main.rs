//! tl_convert CLI
//!
//! Parse a StatsPerform file and print a JSON summary
//! (segments, buffer shapes, event counts, teamsheets, warnings).

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tl_convert::{ConvertRequest, SourceKind};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tl_convert")]
#[command(about = "Parse StatsPerform tracking and event files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InputArgs {
    /// Input file path
    #[arg(long)]
    input: PathBuf,

    /// Home teamsheet JSON (derived from the input when absent)
    #[arg(long)]
    home_teamsheet: Option<PathBuf>,

    /// Away teamsheet JSON (derived from the input when absent)
    #[arg(long)]
    away_teamsheet: Option<PathBuf>,

    /// Parser config JSON (team codes, open framerate)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the summary to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Open event CSV
    OpenEvents(InputArgs),
    /// Open tracking CSV
    OpenTracking(InputArgs),
    /// Event feed XML
    EventsXml(InputArgs),
    /// Tracking stream .txt
    TrackingTxt(InputArgs),
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (kind, args) = match cli.command {
        Commands::OpenEvents(args) => (SourceKind::OpenEvents, args),
        Commands::OpenTracking(args) => (SourceKind::OpenTracking, args),
        Commands::EventsXml(args) => (SourceKind::EventsXml, args),
        Commands::TrackingTxt(args) => (SourceKind::TrackingTxt, args),
    };

    let request = ConvertRequest {
        kind,
        input: args.input,
        home_teamsheet: args.home_teamsheet,
        away_teamsheet: args.away_teamsheet,
        config: args.config,
    };
    let summary = tl_convert::convert(&request)?;

    match args.out {
        Some(out) => {
            tl_convert::write_summary(&out, &summary)?;
            eprintln!("Summary written to: {}", out.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tl_convert CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
