//! Command implementations.

pub mod completions;
pub mod list;
pub mod show;
pub mod sync;
pub mod version;

use crate::config::{default_actor, load_config, resolve_db_path, TemplateSyncConfig};
use crate::error::Result;
use crate::storage::SqliteStorage;
use std::path::PathBuf;
use tracing::debug;

/// Open the collection store the way every command does.
fn open_storage(
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    config: &TemplateSyncConfig,
) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path), config)?;
    let actor = actor.map(ToString::to_string).unwrap_or_else(default_actor);
    debug!(db = %db_path.display(), actor = %actor, "Opening collection");

    Ok(SqliteStorage::open(&db_path)?.with_actor(&actor))
}

/// Load the config file and open the collection store.
fn open_configured(
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
) -> Result<(TemplateSyncConfig, SqliteStorage)> {
    let config = load_config()?;
    let storage = open_storage(db_path, actor, &config)?;
    Ok((config, storage))
}
