//! Note type synchronization.
//!
//! A run pulls the published template repository into a scratch workspace
//! and reconciles every note type it defines with the collection store:
//!
//! - **Workspace**: Locked scratch directory, emptied before the fetch and
//!   removed afterwards
//! - **Fetch**: Shallow `git clone` of the repository (or any [`Fetcher`])
//! - **Discover**: One note type per top-level folder, in name order
//! - **Diff**: Ordinal-matched structural comparison against the stored record
//! - **Import**: Create absent note types, overwrite changed ones, skip the rest
//!
//! # Example
//!
//! ```ignore
//! use template_sync::sync::{run_sync, GitFetcher, SyncOptions};
//!
//! let stats = run_sync(&mut storage, &GitFetcher::default(), url, &workspace, SyncOptions::default())?;
//! println!("{}", stats.summary());
//! ```

mod diff;
mod discover;
mod fetch;
mod import;
mod run;
mod types;
mod workspace;

pub use diff::is_different;
pub use discover::note_types;
pub use fetch::{Fetcher, GitFetcher};
pub use import::Importer;
pub use run::run_sync;
pub use types::{NotetypeChange, SyncError, SyncOptions, SyncOutcome, SyncResult, SyncStats};
pub use workspace::Workspace;
