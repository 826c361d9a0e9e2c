//! Scoped working directory for fetched template trees.
//!
//! A [`Workspace`] is acquired fresh before every fetch and removed when it
//! goes out of scope, whether the run succeeded or not. An advisory lock on a
//! sibling `.lock` file keeps two runs from sharing the directory; the OS
//! drops the lock with the process, so a killed run never blocks the next.
//!
//! Only directories this crate created are ever cleared. Each one carries an
//! owner marker, and the tree is fetched into a subdirectory next to it.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::sync::types::{SyncError, SyncResult};

/// Marks a directory as a template-sync workspace.
pub(crate) const OWNER_MARKER: &str = ".template-sync-workspace";

/// Subdirectory the repository is fetched into.
const CHECKOUT_DIR: &str = "tree";

/// A workspace directory owned by one sync run.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    checkout: PathBuf,
    lock_path: PathBuf,
    lock: File,
}

impl Workspace {
    /// Take the lock, clear anything a previous run left at `root`, and
    /// recreate it with an empty checkout directory.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NotOwned` if `root` holds anything that is not a
    /// template-sync workspace, `SyncError::Locked` if another run holds the
    /// lock, or an IO error if the directory cannot be reset.
    pub fn acquire(root: &Path) -> SyncResult<Self> {
        ensure_owned(root)?;

        let lock_path = lock_path_for(root);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        if let Err(e) = FileExt::try_lock_exclusive(&lock) {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(SyncError::Locked { path: lock_path });
            }
            return Err(e.into());
        }

        // From here on Drop releases the lock, even if the reset fails.
        let workspace = Self {
            root: root.to_path_buf(),
            checkout: root.join(CHECKOUT_DIR),
            lock_path,
            lock,
        };

        if workspace.root.exists() {
            warn!(path = %workspace.root.display(), "Removing stale workspace contents");
            fs::remove_dir_all(&workspace.root)?;
        }
        fs::create_dir_all(&workspace.checkout)?;
        fs::write(workspace.root.join(OWNER_MARKER), "")?;
        debug!(path = %workspace.root.display(), "Workspace acquired");

        Ok(workspace)
    }

    /// The empty directory to fetch into.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.checkout
    }

    /// The workspace directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.root.display(), error = %e, "Failed to remove workspace");
            }
        }
        if let Err(e) = fs::remove_file(&self.lock_path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.lock_path.display(), error = %e, "Failed to remove workspace lock file");
            }
        }
        if let Err(e) = FileExt::unlock(&self.lock) {
            warn!(path = %self.lock_path.display(), error = %e, "Failed to release workspace lock");
        }
    }
}

/// `root` must be absent, an empty directory, or a marked workspace.
fn ensure_owned(root: &Path) -> SyncResult<()> {
    let not_owned = || SyncError::NotOwned {
        path: root.to_path_buf(),
    };

    let meta = match fs::symlink_metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if !meta.is_dir() {
        return Err(not_owned());
    }

    if root.join(OWNER_MARKER).is_file() || fs::read_dir(root)?.next().is_none() {
        Ok(())
    } else {
        Err(not_owned())
    }
}

/// `<dir>.lock` next to the workspace directory.
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}
