//! Note type value model.
//!
//! This module contains the schema records fetched from the template
//! repository:
//! - Field
//! - Template
//! - NoteType
//!
//! Each is parsed from its on-disk descriptor and folded into the
//! store-native [`NotetypeRecord`](crate::storage::NotetypeRecord).

pub mod field;
pub mod note_type;
pub mod template;

pub use field::{Field, FieldDescriptor};
pub use note_type::{NoteKind, NoteType, NoteTypeDescriptor, DEFAULT_CSS_FILE, DESCRIPTOR_FILE};
pub use template::{Template, TemplateDescriptor};

use std::fs;
use std::path::Path;

use crate::sync::{SyncError, SyncResult};

/// Read a referenced source file as UTF-8.
///
/// A missing or unreadable file is a source format error, not an I/O error:
/// the definition tree references something it does not contain.
pub(crate) fn read_source(path: &Path) -> SyncResult<String> {
    fs::read_to_string(path).map_err(|e| SyncError::SourceFormat {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
