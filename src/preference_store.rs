use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create preference directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to read preference state {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write preference state {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize preference state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable scalar preferences shared by every window of the process.
pub trait PreferenceStore: Send + Sync {
    /// Absent, unreadable and malformed values all read as `None`.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A poisoned map still holds the last complete write.
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as top-level string fields of a JSON object file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_for_update(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "preference state has non-object root; resetting state file"
                );
                Ok(Map::new())
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "failed to parse preference state; resetting state file"
                );
                Ok(Map::new())
            }
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let parsed: Value = serde_json::from_str(&raw).ok()?;
        parsed.get(key)?.as_str().map(str::to_string)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent_dir) = self.path.parent() {
            fs::create_dir_all(parent_dir).map_err(|source| StoreError::CreateDir {
                path: parent_dir.to_path_buf(),
                source,
            })?;
        }

        let mut object = self.load_for_update()?;
        object.insert(key.to_string(), Value::String(value.to_string()));

        let serialized = serde_json::to_string_pretty(&Value::Object(object))?;
        fs::write(&self.path, serialized).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
