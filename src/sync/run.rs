//! One full sync run: reset the workspace, fetch, reconcile, clean up.

use std::path::Path;

use tracing::info;

use crate::storage::NotetypeStore;
use crate::sync::fetch::Fetcher;
use crate::sync::import::Importer;
use crate::sync::types::{SyncOptions, SyncResult, SyncStats};
use crate::sync::workspace::Workspace;

/// Fetch `url` into `workspace` and reconcile every note type it defines.
///
/// The workspace directory is emptied before the fetch and removed again
/// when the run ends, on success and on failure alike.
///
/// # Errors
///
/// Returns the first workspace, fetch, parse, diff or store error. A
/// workspace path that was not created by a previous run is refused with
/// `SyncError::NotOwned`. Note types reconciled before the error stay written.
pub fn run_sync<S, F>(
    store: &mut S,
    fetcher: &F,
    url: &str,
    workspace: &Path,
    options: SyncOptions,
) -> SyncResult<SyncStats>
where
    S: NotetypeStore,
    F: Fetcher + ?Sized,
{
    let workspace = Workspace::acquire(workspace)?;

    info!(url, path = %workspace.path().display(), "Fetching templates");
    fetcher.fetch(url, workspace.path())?;

    let stats = Importer::new(store)
        .dry_run(options.dry_run)
        .import_all(workspace.path())?;

    info!(
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        dry_run = options.dry_run,
        "Sync complete"
    );
    Ok(stats)
}
