//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Calendar widget agenda builder.
///
/// Replays recorded calendar and task rows through the agenda engine and
/// prints the entries a widget would show.
#[derive(Debug, Parser)]
#[command(name = "agenda", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build and print the agenda of every widget in a fixture.
    Render {
        /// Recorded fixture file (JSON).
        fixture: PathBuf,

        /// Only render the widget with this id.
        #[arg(long)]
        widget: Option<u32>,

        /// Current time as RFC 3339, overriding the fixture's.
        #[arg(long)]
        now: Option<String>,

        /// IANA time zone, overriding the fixture and config.
        #[arg(long)]
        zone: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report fixture rows that would be skipped, and why.
    Check {
        /// Recorded fixture file (JSON).
        fixture: PathBuf,
    },
}
