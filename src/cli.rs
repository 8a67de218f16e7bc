//! Command-line interface.
//!
//! Flags override the settings file, which overrides built-in defaults.

use crate::config::DashboardConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "pprof_dashboard")]
#[command(author, version, about = "Live profile tables and runtime sparklines for a pprof backend")]
pub struct Cli {
    /// Profiling backend to watch; it must serve /p and /stats
    #[arg(long)]
    pub target: Option<String>,

    /// Settings file (default: ~/.config/pprof-dashboard/settings.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Delay between stats polls in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Samples kept per sparkline, trailing zero included
    #[arg(long)]
    pub history_len: Option<usize>,

    /// Log at debug level
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    pub fn apply_overrides(&self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(ref target) = self.target {
            config.target = target.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(len) = self.history_len {
            config.history_len = len;
        }
        config
    }
}
