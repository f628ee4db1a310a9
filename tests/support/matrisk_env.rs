use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const CONFIG_HOME_VAR: &str = "MATRISK_CONFIG_HOME";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points `MATRISK_CONFIG_HOME` at a test directory until dropped.
pub struct MatriskEnvGuard {
    previous: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl MatriskEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var(CONFIG_HOME_VAR).ok();
        // SAFETY: env mutation only happens while holding ENV_LOCK.
        unsafe {
            std::env::set_var(CONFIG_HOME_VAR, path);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for MatriskEnvGuard {
    fn drop(&mut self) {
        // SAFETY: env mutation only happens while holding ENV_LOCK.
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(CONFIG_HOME_VAR, value),
                None => std::env::remove_var(CONFIG_HOME_VAR),
            }
        }
    }
}
