use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agenda_cli::commands::render::RenderOptions;
use agenda_cli::commands::{check, render};
use agenda_cli::{Cli, Commands, Config, Fixture};

fn parse_now(value: &str) -> Result<DateTime<Utc>> {
    let now = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("invalid --now value {value}, expected RFC 3339"))?;
    Ok(now.with_timezone(&Utc))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Some(Commands::Render {
            fixture,
            widget,
            now,
            zone,
            json,
        }) => {
            let options = RenderOptions {
                widget: *widget,
                now: now.as_deref().map(parse_now).transpose()?,
                zone: zone.as_deref().map(agenda_cli::parse_zone).transpose()?,
                json: *json,
            };
            let fixture = Fixture::load(fixture)?;
            render::run(&mut stdout, &fixture, &config, &options)?;
        }
        Some(Commands::Check { fixture }) => {
            let fixture = Fixture::load(fixture)?;
            let skipped = check::run(&mut stdout, &fixture, &config)?;
            if skipped > 0 {
                tracing::debug!(skipped, "fixture has rows the engine skips");
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
