//! Error types for template-sync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=store, 3=not_found, 4=source format, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use thiserror::Error;

use crate::sync::SyncError;

/// Result type alias for template-sync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (exit 2)
    StoreError,
    RunInProgress,

    // Not Found (exit 3)
    NotetypeNotFound,

    // Source definitions (exit 4)
    SourceFormatError,
    InvalidArgument,

    // Integrity (exit 5)
    MatchIntegrityError,

    // Fetch (exit 6)
    FetchError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StoreError => "STORE_ERROR",
            Self::RunInProgress => "RUN_IN_PROGRESS",
            Self::NotetypeNotFound => "NOTETYPE_NOT_FOUND",
            Self::SourceFormatError => "SOURCE_FORMAT_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MatchIntegrityError => "MATCH_INTEGRITY_ERROR",
            Self::FetchError => "FETCH_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StoreError | Self::RunInProgress => 2,
            Self::NotetypeNotFound => 3,
            Self::SourceFormatError | Self::InvalidArgument => 4,
            Self::MatchIntegrityError => 5,
            Self::FetchError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying the same run could succeed without changes.
    ///
    /// Only transient conditions qualify: a concurrent run holding the
    /// workspace, or a fetch that may have hit a network hiccup.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RunInProgress | Self::FetchError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in template-sync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Note type not found: {name}")]
    NotetypeNotFound { name: String },

    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotetypeNotFound { .. } => ErrorCode::NotetypeNotFound,
            Self::Sync(e) => match e {
                SyncError::SourceFormat { .. } => ErrorCode::SourceFormatError,
                SyncError::Fetch(_) => ErrorCode::FetchError,
                SyncError::Store(_) => ErrorCode::StoreError,
                SyncError::MatchIntegrity { .. } => ErrorCode::MatchIntegrityError,
                SyncError::Locked { .. } => ErrorCode::RunInProgress,
                SyncError::NotOwned { .. } => ErrorCode::InvalidArgument,
                SyncError::Io(_) => ErrorCode::IoError,
            },
            Self::Database(_) => ErrorCode::StoreError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotetypeNotFound { name } => Some(format!(
                "No note type named '{name}'. Use `template-sync list` to see stored note types."
            )),

            Self::Sync(SyncError::Locked { .. }) => {
                Some("Wait for the other sync run to finish, then try again.".to_string())
            }

            Self::Sync(SyncError::NotOwned { .. }) => Some(
                "Point --workspace (or TEMPLATE_SYNC_WORKSPACE) at a new or empty directory; \
                 its contents are replaced on every run."
                    .to_string(),
            ),

            Self::Sync(SyncError::Fetch(_)) => Some(
                "Check that `git` is installed and the repository URL is reachable \
                 (override with --repo or TEMPLATE_SYNC_REPO)."
                    .to_string(),
            ),

            Self::Sync(SyncError::SourceFormat { path, .. }) => Some(format!(
                "Fix the definition at {}; no changes were written for that note type.",
                path.display()
            )),

            Self::Sync(SyncError::MatchIntegrity { notetype, .. }) => Some(format!(
                "The stored '{notetype}' uses different ordinals than the fetched definition. \
                 Rename or remove the stored note type, then sync again."
            )),

            Self::Config(_) => Some(
                "Check ~/.template-sync/config.json or the TEMPLATE_SYNC_* environment variables."
                    .to_string(),
            ),

            Self::Sync(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
