use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;

use super::map_app_dir_error;
use super::save::save_to_path;
use super::types::{AppSettings, ConfigError};
use crate::app_dirs;

/// Resolve `config.toml`, creating its folder if needed.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    app_dirs::config_file_path().map_err(map_app_dir_error)
}

/// Load settings, writing a default file first when none exists yet.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        let settings = AppSettings::default();
        save_to_path(&settings, &path)?;
        tracing::info!("Wrote default settings to {}", path.display());
        return Ok(settings);
    }
    load_from_path(&path)
}

/// Parse and normalize settings from `path`; a missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    let settings: AppSettings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    let normalized = settings.clone().normalized();
    if normalized != settings {
        tracing::warn!("Clamped out-of-range values in {}", path.display());
    }
    Ok(normalized)
}
