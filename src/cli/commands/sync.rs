//! Sync command implementations.
//!
//! `sync` clones the template repository into the workspace and reconciles
//! it with the collection; `import` does the same from a directory the user
//! already has on disk.

use crate::cli::commands::open_configured;
use crate::config::{resolve_repository_url, resolve_workspace_dir};
use crate::error::{Error, Result};
use crate::sync::{run_sync, GitFetcher, Importer, SyncOptions, SyncOutcome, SyncStats};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute `sync`: fetch the repository, then reconcile.
///
/// # Errors
///
/// Returns an error if configuration, the fetch, a definition, or the store
/// fails. Note types reconciled before the failure stay written.
pub fn execute_sync(
    repo: Option<&str>,
    workspace: Option<&PathBuf>,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let (config, mut storage) = open_configured(db_path, actor)?;
    let url = resolve_repository_url(repo, &config);
    let workspace = resolve_workspace_dir(workspace.map(PathBuf::as_path), &config)?;

    let stats = run_sync(
        &mut storage,
        &GitFetcher::default(),
        &url,
        &workspace,
        SyncOptions { dry_run },
    )?;

    report(&stats, &url, dry_run, json, quiet)
}

/// Execute `import`: reconcile from a local template tree.
///
/// # Errors
///
/// Returns an error if `dir` is not a directory, a definition is malformed,
/// or the store fails.
pub fn execute_import(
    dir: &Path,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let (_, mut storage) = open_configured(db_path, actor)?;
    let stats = Importer::new(&mut storage)
        .dry_run(dry_run)
        .import_all(dir)?;

    report(&stats, &dir.display().to_string(), dry_run, json, quiet)
}

fn report(stats: &SyncStats, source: &str, dry_run: bool, json: bool, quiet: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "success": true,
            "source": source,
            "dry_run": dry_run,
            "summary": stats.summary(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    for change in &stats.changes {
        let label = match change.outcome {
            SyncOutcome::Created => "added".green(),
            SyncOutcome::Updated => "updated".yellow(),
            SyncOutcome::Skipped => continue,
        };
        println!("  {label:>7}  {}", change.name);
    }

    let summary = stats.summary();
    if dry_run {
        println!("{} {}", "[dry run]".dimmed(), summary.bold());
    } else {
        println!("{}", summary.green().bold());
    }
    Ok(())
}
