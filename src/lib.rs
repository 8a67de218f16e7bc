//! pprof Dashboard Rust Core
//!
//! A desktop dashboard for a profiling backend: it fetches heap/CPU report
//! tables from `/p` and keeps rolling sparklines of goroutine, thread and
//! blocking-event counts sampled from `/stats`.
//!
//! **Architecture**: The egui frontend owns a `DashboardClient`; background
//! tokio tasks perform the HTTP work and report back over a channel that the
//! UI drains every frame.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Wire types for report rows, queries and stats samples
//! - **config**: Settings file handling
//! - **backend**: `ProfileBackend` trait and its reqwest implementation
//! - **dashboard**: Session state, table view, buffers, charts, poller, prompt
//! - **ui**: egui integration
//! - **cli**: Command-line flags

// Core foundational modules
pub mod error;
pub mod models;

// Settings file and defaults
pub mod config;

// HTTP transport
pub mod backend;

// Client-side dashboard logic (UI-independent)
pub mod dashboard;

// egui integration
pub mod ui;

// Robust, decoupled logging system
pub mod log_collector;

pub mod cli;

// Re-export the log crate for macro usage
pub use log;

// Re-export log collector for use throughout the system
pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AppError, CommandError, ConfigError, FetchError, Result};

pub use models::{
    Metric, ProfileKind, ReportRow, StatsMetric, StatsSample, TableQuery, TableResponse,
};

pub use config::DashboardConfig;

pub use backend::{HttpBackend, ProfileBackend};

pub use dashboard::{DashboardClient, DashboardEvent, DashboardSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_error_reexport() {
        let _: Result<i32> = Ok(42);
        let _ = FetchError::Timeout(60);
    }

    #[test]
    fn test_models_reexport() {
        assert_eq!(ProfileKind::Cpu.as_str(), "profile");
        assert_eq!(StatsMetric::all().len(), 3);
    }
}
