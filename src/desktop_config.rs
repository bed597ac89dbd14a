use std::{env, path::PathBuf};

use crate::{DEFAULT_ROOT_DIR_NAME, DESKTOP_STATE_FILE, ROOT_DIR_ENV};

/// Locations the desktop shell reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub data_root: PathBuf,
}

impl DesktopConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_data_root(
            env::var(ROOT_DIR_ENV).ok(),
            home::home_dir(),
        ))
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_root.join("data").join(DESKTOP_STATE_FILE)
    }
}

fn resolve_data_root(env_root: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    if let Some(root) = env_root {
        let root = root.trim();
        if !root.is_empty() {
            return PathBuf::from(root);
        }
    }

    home_dir
        .map(|home| home.join(DEFAULT_ROOT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR_NAME))
}
