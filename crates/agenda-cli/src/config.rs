//! Configuration loading and management.

use std::path::{Path, PathBuf};

use agenda_core::AgendaSettings;
use anyhow::{Result, anyhow};
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used when neither the fixture nor the command line names one.
    pub time_zone: Option<String>,
    /// Settings for fixture widgets that carry none of their own.
    #[serde(default)]
    pub defaults: AgendaSettings,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // AGENDA_TIME_ZONE, AGENDA_DEFAULTS__EVENT_RANGE_DAYS, ...
        figment = figment.merge(Env::prefixed("AGENDA_").split("__"));

        figment.extract()
    }

    /// The configured zone, else the system zone, else UTC.
    pub fn zone(&self) -> Result<Tz> {
        match &self.time_zone {
            Some(name) => parse_zone(name),
            None => Ok(system_zone()),
        }
    }
}

/// Parses an IANA zone id.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("unknown time zone {name}: {e}"))
}

fn system_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            tracing::warn!(zone = %name, "system time zone is not a known IANA id, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine system time zone, using UTC");
            Tz::UTC
        }
    }
}

/// Returns the platform-specific config directory for agenda.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("agenda"))
}
