//! Config file loader and serialization.

use super::DashboardConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the global settings path: ~/.config/pprof-dashboard/settings.json
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::ValidationFailed("Cannot determine home directory".to_string())
    })?;

    let config_dir = home.join(".config/pprof-dashboard");
    Ok(config_dir.join("settings.json"))
}

/// Load config from JSON file.
pub fn load_config_from_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config: DashboardConfig = serde_json::from_str(&content).map_err(ConfigError::InvalidJson)?;
    config.validate()?;

    Ok(config)
}

/// Load config from `path`, falling back to defaults when the file is absent.
///
/// A present but malformed file is still an error.
pub fn load_or_default(path: &Path) -> Result<DashboardConfig, ConfigError> {
    match load_config_from_file(path) {
        Ok(config) => {
            log::info!("[CONFIG] Loaded settings from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound(_)) => {
            log::debug!("[CONFIG] No settings at {}, using defaults", path.display());
            Ok(DashboardConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Save config to JSON file.
pub fn save_config_to_file(config: &DashboardConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }
    }

    let json_content = serde_json::to_string_pretty(config).map_err(ConfigError::InvalidJson)?;
    fs::write(path, json_content).map_err(ConfigError::IoError)?;

    Ok(())
}

/// Validate config path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => {}
        Some(ext) => {
            return Err(ConfigError::ValidationFailed(format!(
                "Configuration file must have .json extension, got .{}",
                ext.to_string_lossy()
            )))
        }
        None => {
            return Err(ConfigError::ValidationFailed(
                "Configuration file must have .json extension".to_string(),
            ))
        }
    }

    Ok(())
}
