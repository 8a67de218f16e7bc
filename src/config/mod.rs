//! Configuration module for the dashboard.
//!
//! `DashboardConfig` holds the backend target and the polling/buffer knobs.
//! It is loaded from `~/.config/pprof-dashboard/settings.json` when present,
//! then overridden by command-line flags.
//!
//! # Module Structure
//!
//! - `loader`: Handles loading and saving the JSON settings file

pub mod loader;

use crate::error::ConfigError;
use crate::models::ProfileKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default backend address (the profiling proxy's listen address)
pub const DEFAULT_TARGET: &str = "http://localhost:6464";

/// Dashboard settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the profiling backend
    pub target: String,
    /// Delay between stats polls
    pub poll_interval_ms: u64,
    /// Maximum length of each rolling buffer, sentinel included
    pub history_len: usize,
    /// Client-side timeout for table requests (CPU profiles take ~30s)
    pub request_timeout_secs: u64,
    /// Profile selected at startup
    pub default_profile: ProfileKind,
    /// Cumulative sort at startup
    pub cumsort: bool,
    /// Directory for log files; `./logs` when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            poll_interval_ms: 500,
            history_len: 270,
            request_timeout_secs: 60,
            default_profile: ProfileKind::Heap,
            cumsort: true,
            log_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Target without a trailing slash, ready for path joins
    pub fn base_url(&self) -> &str {
        self.target.trim_end_matches('/')
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target.starts_with("http://") || self.target.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "target must be an http(s) URL, got '{}'",
                self.target
            )));
        }
        if self.poll_interval_ms < 50 {
            return Err(ConfigError::ValidationFailed(format!(
                "poll_interval_ms must be at least 50, got {}",
                self.poll_interval_ms
            )));
        }
        // One real sample plus the trailing zero
        if self.history_len < 2 {
            return Err(ConfigError::ValidationFailed(format!(
                "history_len must be at least 2, got {}",
                self.history_len
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_len, 270);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.default_profile, ProfileKind::Heap);
        assert!(config.cumsort);
    }

    #[test]
    fn test_rejects_tiny_history() {
        let config = DashboardConfig { history_len: 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn test_rejects_non_http_target() {
        let config = DashboardConfig { target: "localhost:6060".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = DashboardConfig { target: "http://host:6464/".to_string(), ..Default::default() };
        assert_eq!(config.base_url(), "http://host:6464");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"target":"http://10.0.0.5:6464","default_profile":"profile"}"#)
                .unwrap();
        assert_eq!(config.target, "http://10.0.0.5:6464");
        assert_eq!(config.default_profile, ProfileKind::Cpu);
        assert_eq!(config.history_len, 270);
    }
}
