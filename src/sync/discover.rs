//! Discovery of note type definitions in a fetched tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::NoteType;
use crate::sync::types::SyncResult;

/// Folders that never hold a definition.
const IGNORED_DIRS: &[&str] = &[".git"];

/// Lazily parse every note type folder directly under `dir`.
///
/// Plain files and version-control metadata are skipped. Folders are visited
/// in name order so runs are reproducible across platforms. Each item is
/// parsed only when the iterator reaches it.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed. Per-folder parse failures are
/// yielded as `Err` items.
pub fn note_types(dir: &Path) -> SyncResult<impl Iterator<Item = SyncResult<NoteType>> + use<>> {
    let mut folders: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if IGNORED_DIRS.iter().any(|ignored| entry.file_name() == *ignored) {
            continue;
        }
        folders.push(path);
    }

    folders.sort();
    Ok(folders.into_iter().map(|folder| NoteType::from_folder(&folder)))
}
