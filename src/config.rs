//! TOML settings stored in `.matrisk/config.toml`.
//!
//! Keys: `[training]` (`seed`, `test_fraction`, `classifier`, plus the
//! `[training.forest]` and `[training.boosting]` tables) and `[form]` (initial
//! values for the six vitals). Missing keys take their defaults and
//! out-of-range values are clamped on load.

mod load;
mod save;
mod types;

pub use load::{config_path, load_from_path, load_or_default};
pub use save::save_to_path;
pub use types::{AppSettings, ConfigError};

use crate::app_dirs::AppDirError;

fn map_app_dir_error(error: AppDirError) -> ConfigError {
    match error {
        AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}

#[cfg(test)]
mod tests;
