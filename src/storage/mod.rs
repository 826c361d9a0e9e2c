//! Collection store layer.
//!
//! The sync core only needs three operations from the host collection:
//! look a note type up by name, add a new one, and overwrite an existing
//! one. [`NotetypeStore`] is that contract; [`SqliteStorage`] implements it
//! with SQLite using:
//! - WAL mode
//! - One IMMEDIATE transaction per write
//! - Audit events for history
//!
//! # Submodules
//!
//! - [`events`] - Audit event storage
//! - [`record`] - Store-native note type records
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - SQLite store implementation

pub mod events;
pub mod record;
pub mod schema;
pub mod sqlite;

pub use record::{FieldRecord, NotetypeRecord, TemplateRecord};
pub use sqlite::{MutationContext, NotetypeSummary, SqliteStorage};

use crate::error::Result;

/// Note type access the sync core needs from a collection store.
///
/// The store owns identity: `add` assigns `id`, `mod` and `usn`; `save`
/// keeps `id` and refreshes `mod` and `usn`. Nothing is ever deleted.
pub trait NotetypeStore {
    /// Look up a note type by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn by_name(&self, name: &str) -> Result<Option<NotetypeRecord>>;

    /// Insert a new note type, filling in its store-assigned identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn add(&mut self, record: &mut NotetypeRecord) -> Result<()>;

    /// Overwrite the note type with `record.id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no note type has that id or the write fails.
    fn save(&mut self, record: &mut NotetypeRecord) -> Result<()>;
}
