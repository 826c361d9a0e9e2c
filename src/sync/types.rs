//! Sync types: outcomes, statistics, options and errors.

use std::path::PathBuf;

use serde::Serialize;

/// What reconciling one note type did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No note type of that name existed; it was added.
    Created,
    /// A stored note type differed and was overwritten.
    Updated,
    /// The stored note type already matched.
    Skipped,
}

/// One reconciled note type.
#[derive(Debug, Clone, Serialize)]
pub struct NotetypeChange {
    pub name: String,
    pub outcome: SyncOutcome,
}

/// Tally of a sync run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncStats {
    /// Number of note types added.
    pub created: usize,
    /// Number of note types overwritten.
    pub updated: usize,
    /// Number of note types left untouched.
    pub skipped: usize,
    /// Per-note-type outcomes in processing order.
    pub changes: Vec<NotetypeChange>,
}

impl SyncStats {
    /// Count one reconciled note type.
    pub fn record(&mut self, name: &str, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
        self.changes.push(NotetypeChange {
            name: name.to_string(),
            outcome,
        });
    }

    /// Total note types processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped
    }

    /// Human-readable summary of the run.
    ///
    /// Only creates and updates are reported; a run that changed nothing
    /// reads "Updated 0 templates!".
    #[must_use]
    pub fn summary(&self) -> String {
        let updated = noun(self.updated);
        let created = noun(self.created);

        if self.created == 0 {
            format!("Updated {} {updated}!", self.updated)
        } else if self.updated == 0 {
            format!("Added {} new {created}!", self.created)
        } else {
            format!(
                "Updated {} {updated} and added {} new {created}!",
                self.updated, self.created
            )
        }
    }
}

fn noun(count: usize) -> &'static str {
    if count == 1 { "template" } else { "templates" }
}

/// Knobs for a sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Diff against the store but write nothing.
    pub dry_run: bool,
}

/// Sync-specific errors.
///
/// Every variant is fatal to the run; writes already applied stay applied.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// IO error during workspace or discovery operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A definition's descriptor or referenced file is missing or malformed.
    #[error("Invalid template source {}: {message}", path.display())]
    SourceFormat {
        /// File that could not be read or parsed.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The external fetch failed or could not be started.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The store rejected a read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// A fetched ordinal has no counterpart in the stored note type.
    #[error("Stored note type '{notetype}' has no {kind} with ord {ord}")]
    MatchIntegrity {
        /// Name of the note type being compared.
        notetype: String,
        /// "field" or "template".
        kind: &'static str,
        /// Zero-based store order that was not found.
        ord: u32,
    },

    /// The workspace path holds something this crate did not create.
    #[error("Refusing to clear {}: not a template-sync workspace", path.display())]
    NotOwned {
        /// Directory or file that was left untouched.
        path: PathBuf,
    },

    /// Another run holds the workspace lock.
    #[error("Another sync run is in progress (lock held at {})", path.display())]
    Locked {
        /// Lock file path.
        path: PathBuf,
    },
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
