//! Fetching the template repository.
//!
//! The fetch itself is delegated to an external `git` client; this crate
//! only needs the working tree of the default branch.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::sync::types::{SyncError, SyncResult};

/// Populates an empty directory with the definition tree at `url`.
pub trait Fetcher {
    /// # Errors
    ///
    /// Returns `SyncError::Fetch` if the tree could not be fetched.
    fn fetch(&self, url: &str, dest: &Path) -> SyncResult<()>;
}

impl<F> Fetcher for F
where
    F: Fn(&str, &Path) -> SyncResult<()>,
{
    fn fetch(&self, url: &str, dest: &Path) -> SyncResult<()> {
        self(url, dest)
    }
}

/// Shallow `git clone` into the destination directory.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: String,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitFetcher {
    /// Use a specific git executable.
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Fetcher for GitFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> SyncResult<()> {
        info!(url, dest = %dest.display(), "Cloning template repository");

        let output = Command::new(&self.program)
            .args(["clone", "--depth", "1", "--quiet", url])
            .arg(dest)
            .output()
            .map_err(|e| SyncError::Fetch(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::Fetch(format!(
                "{} clone exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        debug!(dest = %dest.display(), "Clone complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_is_fetch_error() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = GitFetcher::with_program("definitely-not-a-git-binary");

        let result = fetcher.fetch("https://example.invalid/templates", temp_dir.path());
        assert!(matches!(result, Err(SyncError::Fetch(_))));
    }

    #[test]
    fn test_closure_fetcher() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = |_url: &str, dest: &Path| -> SyncResult<()> {
            std::fs::create_dir_all(dest.join("basic"))?;
            Ok(())
        };

        fetcher.fetch("unused", temp_dir.path()).unwrap();
        assert!(temp_dir.path().join("basic").exists());
    }
}
