use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::PatientRecord;
use crate::pipeline::TrainingOptions;

/// Everything persisted in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub training: TrainingOptions,
    /// Values the patient form starts with.
    #[serde(default)]
    pub form: PatientRecord,
}

impl AppSettings {
    /// Clamp every numeric setting into its accepted range.
    pub fn normalized(self) -> Self {
        Self {
            training: self.training.normalized(),
            form: self.form.clamped(),
        }
    }
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("No suitable config directory found")]
    NoConfigDir,
}
