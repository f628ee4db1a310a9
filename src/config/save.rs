use std::io::Write;
use std::path::Path;

use rand::TryRngCore;

use super::types::{AppSettings, ConfigError};

const TEMP_NAME_ATTEMPTS: usize = 5;

/// Write settings to `path` through a temporary file so a crash never leaves
/// a half-written config behind.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, text.as_bytes())
}

fn write_error(path: &Path, message: impl Into<String>) -> ConfigError {
    ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(message.into()),
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| write_error(path, "config path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| write_error(path, "config path has no file name"))?
        .to_string_lossy()
        .into_owned();

    for _ in 0..TEMP_NAME_ATTEMPTS {
        let tmp_path = dir.join(format!("{file_name}.tmp-{}", random_suffix(path)?));
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(ConfigError::Write {
                    path: tmp_path,
                    source,
                });
            }
        };
        let flushed = file.write_all(data).and_then(|()| file.sync_all());
        drop(file);
        let written = flushed.and_then(|()| replace_file(&tmp_path, path));
        if let Err(source) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        return sync_dir(dir);
    }
    Err(write_error(
        path,
        format!("no free temporary file name after {TEMP_NAME_ATTEMPTS} attempts"),
    ))
}

fn random_suffix(path: &Path) -> Result<String, ConfigError> {
    let mut bytes = [0u8; 6];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| write_error(path, format!("failed to generate temp file suffix: {err}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn replace_file(temp_path: &Path, path: &Path) -> std::io::Result<()> {
    match std::fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        #[cfg(target_os = "windows")]
        Err(err)
            if matches!(
                err.kind(),
                std::io::ErrorKind::AlreadyExists | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            match std::fs::remove_file(path) {
                Err(inner) if inner.kind() != std::io::ErrorKind::NotFound => return Err(inner),
                _ => {}
            }
            std::fs::rename(temp_path, path)
        }
        Err(err) => Err(err),
    }
}

fn sync_dir(dir: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    std::fs::File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}
