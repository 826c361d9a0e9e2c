//! Configuration management.
//!
//! Every setting resolves in the same order:
//! 1. Explicit CLI flag
//! 2. `TEMPLATE_SYNC_*` environment variable
//! 3. `~/.template-sync/config.json`
//! 4. Built-in default under `~/.template-sync/`
//!
//! Only the collection database, the repository URL and the workspace
//! directory are configurable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Published template repository.
pub const DEFAULT_REPOSITORY_URL: &str = "https://www.github.com/paulhfischer/anki-templates";

const DB_ENV: &str = "TEMPLATE_SYNC_DB";
const REPO_ENV: &str = "TEMPLATE_SYNC_REPO";
const WORKSPACE_ENV: &str = "TEMPLATE_SYNC_WORKSPACE";
const ACTOR_ENV: &str = "TEMPLATE_SYNC_ACTOR";

/// Contents of `~/.template-sync/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSyncConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// Get the global template-sync directory, `~/.template-sync/`.
#[must_use]
pub fn global_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".template-sync"))
}

/// Path of the config file.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    global_dir().map(|dir| dir.join("config.json"))
}

/// Load the config file, or the empty config if there is none.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<TemplateSyncConfig> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(TemplateSyncConfig::default()),
    }
}

/// Load a config file from an explicit location.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<TemplateSyncConfig> {
    if !path.exists() {
        return Ok(TemplateSyncConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

    let config = serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Resolve the collection database path.
///
/// Default: `~/.template-sync/data/collection.db`.
///
/// # Errors
///
/// Returns `Error::Config` if nothing is configured and the home directory
/// cannot be determined.
pub fn resolve_db_path(explicit: Option<&Path>, config: &TemplateSyncConfig) -> Result<PathBuf> {
    first_of(
        explicit.map(Path::to_path_buf),
        env_value(DB_ENV).map(PathBuf::from),
        config.db_path.clone(),
    )
    .or_else(|| global_dir().map(|dir| dir.join("data").join("collection.db")))
    .ok_or_else(|| Error::Config("Could not determine home directory for the database".into()))
}

/// Resolve the template repository URL.
#[must_use]
pub fn resolve_repository_url(explicit: Option<&str>, config: &TemplateSyncConfig) -> String {
    first_of(
        explicit.map(str::to_string),
        env_value(REPO_ENV),
        config.repository_url.clone(),
    )
    .unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_string())
}

/// Resolve the scratch directory the repository is fetched into.
///
/// Default: `~/.template-sync/user_files/templates`.
///
/// # Errors
///
/// Returns `Error::Config` if nothing is configured and the home directory
/// cannot be determined.
pub fn resolve_workspace_dir(
    explicit: Option<&Path>,
    config: &TemplateSyncConfig,
) -> Result<PathBuf> {
    first_of(
        explicit.map(Path::to_path_buf),
        env_value(WORKSPACE_ENV).map(PathBuf::from),
        config.workspace_dir.clone(),
    )
    .or_else(|| global_dir().map(|dir| dir.join("user_files").join("templates")))
    .ok_or_else(|| Error::Config("Could not determine home directory for the workspace".into()))
}

/// Get the default actor recorded on audit events.
///
/// Priority:
/// 1. `TEMPLATE_SYNC_ACTOR` environment variable
/// 2. Git user name
/// 3. System username
/// 4. "unknown"
#[must_use]
pub fn default_actor() -> String {
    if let Some(actor) = env_value(ACTOR_ENV) {
        return actor;
    }

    if let Ok(output) = std::process::Command::new("git")
        .args(["config", "user.name"])
        .output()
    {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    if let Ok(user) = std::env::var("USER") {
        return user;
    }

    "unknown".to_string()
}

/// Non-empty value of an environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn first_of<T>(flag: Option<T>, env: Option<T>, file: Option<T>) -> Option<T> {
    flag.or(env).or(file)
}
