//! Where matrisk keeps its files.
//!
//! Everything lives under one `.matrisk` folder in the OS config directory
//! (`%APPDATA%` on Windows, `~/.config` on Linux). Setting `MATRISK_CONFIG_HOME`
//! moves that base elsewhere, which tests and portable installs rely on.

use std::{
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created under the config base.
pub const APP_DIR_NAME: &str = ".matrisk";
/// Environment variable that replaces the OS config base.
pub const CONFIG_HOME_ENV: &str = "MATRISK_CONFIG_HOME";
/// Settings file name inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

static BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory could be determined for this platform")]
    NoBaseDir,
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.matrisk` folder, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// `.matrisk/logs`, created on first use.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

/// Path of `config.toml`; the parent folder exists afterwards, the file may not.
pub fn config_file_path() -> Result<PathBuf, AppDirError> {
    Ok(app_root_dir()?.join(CONFIG_FILE_NAME))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    create_dir(&path)?;
    Ok(path)
}

fn create_dir(path: &Path) -> Result<(), AppDirError> {
    std::fs::create_dir_all(path).map_err(|source| AppDirError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn base_dir() -> Option<PathBuf> {
    let overridden = BASE_OVERRIDE.lock().ok().and_then(|guard| guard.clone());
    if overridden.is_some() {
        return overridden;
    }
    match std::env::var_os(CONFIG_HOME_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    }
}

/// Points the config base at a temp dir for the guard's lifetime.
///
/// Holds a process-wide lock so tests touching the base never overlap.
#[cfg(test)]
pub(crate) struct BaseOverrideGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl BaseOverrideGuard {
    pub(crate) fn set(path: &Path) -> Self {
        static TEST_LOCK: Mutex<()> = Mutex::new(());
        let lock = TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Ok(mut guard) = BASE_OVERRIDE.lock() {
            *guard = Some(path.to_path_buf());
        }
        Self { _lock: lock }
    }
}

#[cfg(test)]
impl Drop for BaseOverrideGuard {
    fn drop(&mut self) {
        if let Ok(mut guard) = BASE_OVERRIDE.lock() {
            *guard = None;
        }
    }
}
