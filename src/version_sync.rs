//! Copies the `package.json` version into the Tauri manifests and records when
//! the sync happened.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use regex::{NoExpand, Regex};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CARGO_VERSION_PATTERN: &str = r#"version = "[^"]*""#;

#[derive(Debug, thiserror::Error)]
pub enum VersionSyncError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} has no string \"version\" field")]
    MissingVersion { path: PathBuf },
    #[error("version '{version}' in {path} is not valid semver: {source}")]
    InvalidVersion {
        path: PathBuf,
        version: String,
        source: semver::Error,
    },
    #[error("{path} must contain a top-level JSON object")]
    NotAnObject { path: PathBuf },
    #[error("invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Files touched by a sync, laid out like a Tauri project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSyncPaths {
    pub package_json: PathBuf,
    pub cargo_toml: PathBuf,
    pub tauri_conf: PathBuf,
    pub version_info: PathBuf,
}

impl VersionSyncPaths {
    pub fn for_project_root(root: &Path) -> Self {
        let tauri_dir = root.join("src-tauri");
        Self {
            package_json: root.join("package.json"),
            cargo_toml: tauri_dir.join("Cargo.toml"),
            tauri_conf: tauri_dir.join("tauri.conf.json"),
            version_info: tauri_dir.join("version-info.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub update_date: String,
    pub last_sync: String,
}

impl VersionInfo {
    pub fn new(version: &Version, now: DateTime<Utc>) -> Self {
        Self {
            version: version.to_string(),
            update_date: now.format("%Y-%m-%d").to_string(),
            last_sync: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

fn read_file(path: &Path) -> Result<String, VersionSyncError> {
    fs::read_to_string(path).map_err(|source| VersionSyncError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), VersionSyncError> {
    fs::write(path, contents).map_err(|source| VersionSyncError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json(path: &Path, raw: &str) -> Result<Value, VersionSyncError> {
    serde_json::from_str(raw).map_err(|source| VersionSyncError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_package_version(path: &Path) -> Result<Version, VersionSyncError> {
    let manifest = parse_json(path, &read_file(path)?)?;
    let raw = manifest
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| VersionSyncError::MissingVersion {
            path: path.to_path_buf(),
        })?;
    Version::parse(raw).map_err(|source| VersionSyncError::InvalidVersion {
        path: path.to_path_buf(),
        version: raw.to_string(),
        source,
    })
}

/// Replaces the first `version = "..."` in the manifest. `None` if there is none.
pub fn rewrite_cargo_version(
    manifest: &str,
    version: &Version,
) -> Result<Option<String>, VersionSyncError> {
    let pattern = Regex::new(CARGO_VERSION_PATTERN)?;
    if !pattern.is_match(manifest) {
        return Ok(None);
    }
    let replacement = format!("version = \"{version}\"");
    Ok(Some(
        pattern
            .replacen(manifest, 1, NoExpand(&replacement))
            .into_owned(),
    ))
}

/// Sets the top-level `version` and re-serialises with two-space indentation,
/// keeping key order.
pub fn rewrite_tauri_conf_version(
    path: &Path,
    raw: &str,
    version: &Version,
) -> Result<String, VersionSyncError> {
    let mut conf = parse_json(path, raw)?;
    let Some(object) = conf.as_object_mut() else {
        return Err(VersionSyncError::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    object.insert("version".to_string(), Value::String(version.to_string()));
    serde_json::to_string_pretty(&conf).map_err(|source| VersionSyncError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs the whole sync. The first failure aborts; files already written stay written.
pub fn sync_versions<F>(
    paths: &VersionSyncPaths,
    now: DateTime<Utc>,
    log: F,
) -> Result<VersionInfo, VersionSyncError>
where
    F: Fn(&str),
{
    let version = read_package_version(&paths.package_json)?;
    let info = VersionInfo::new(&version, now);
    log(&format!("syncing version {version}"));
    log(&format!("update date: {}", info.update_date));

    let cargo_toml = read_file(&paths.cargo_toml)?;
    match rewrite_cargo_version(&cargo_toml, &version)? {
        Some(rewritten) => {
            write_file(&paths.cargo_toml, &rewritten)?;
            log(&format!("updated {}", paths.cargo_toml.display()));
        }
        None => {
            write_file(&paths.cargo_toml, &cargo_toml)?;
            log(&format!(
                "no version entry in {}; left unchanged",
                paths.cargo_toml.display()
            ));
        }
    }

    let tauri_conf = read_file(&paths.tauri_conf)?;
    let tauri_conf = rewrite_tauri_conf_version(&paths.tauri_conf, &tauri_conf, &version)?;
    write_file(&paths.tauri_conf, &tauri_conf)?;
    log(&format!("updated {}", paths.tauri_conf.display()));

    let serialized =
        serde_json::to_string_pretty(&info).map_err(|source| VersionSyncError::Serialize {
            path: paths.version_info.clone(),
            source,
        })?;
    write_file(&paths.version_info, &serialized)?;
    log(&format!("wrote {}", paths.version_info.display()));

    log("version sync complete");
    Ok(info)
}
