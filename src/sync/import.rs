//! Reconciling fetched note types with the collection store.
//!
//! Each note type is looked up by name. Absent ones are created; present
//! ones are overwritten only when the structural diff finds a change, and
//! always keep the store-assigned id of the existing record.

use std::path::Path;

use tracing::{debug, info};

use crate::model::NoteType;
use crate::storage::NotetypeStore;
use crate::sync::diff::is_different;
use crate::sync::discover::note_types;
use crate::sync::types::{SyncError, SyncOutcome, SyncResult, SyncStats};

/// Importer for fetched note type definitions.
pub struct Importer<'a, S: NotetypeStore> {
    storage: &'a mut S,
    dry_run: bool,
}

impl<'a, S: NotetypeStore> Importer<'a, S> {
    /// Create a new importer writing to `storage`.
    #[must_use]
    pub fn new(storage: &'a mut S) -> Self {
        Self {
            storage,
            dry_run: false,
        }
    }

    /// Decide outcomes without writing to the store.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile one note type with the store.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Store` if the store rejects a read or write, or
    /// `SyncError::MatchIntegrity` if the stored record cannot be matched.
    pub fn import_note_type(&mut self, note_type: &NoteType) -> SyncResult<SyncOutcome> {
        let mut candidate = note_type.to_record();

        let existing = self
            .storage
            .by_name(&note_type.name)
            .map_err(|e| SyncError::Store(e.to_string()))?;

        let Some(existing) = existing else {
            if !self.dry_run {
                self.storage
                    .add(&mut candidate)
                    .map_err(|e| SyncError::Store(e.to_string()))?;
            }
            info!(name = %note_type.name, id = candidate.id, "Created note type");
            return Ok(SyncOutcome::Created);
        };

        candidate.id = existing.id;

        if !is_different(&existing, &candidate)? {
            debug!(name = %note_type.name, "Note type unchanged");
            return Ok(SyncOutcome::Skipped);
        }

        if !self.dry_run {
            self.storage
                .save(&mut candidate)
                .map_err(|e| SyncError::Store(e.to_string()))?;
        }
        info!(name = %note_type.name, id = candidate.id, "Updated note type");
        Ok(SyncOutcome::Updated)
    }

    /// Import every note type folder under `dir`.
    ///
    /// Stops at the first error; note types reconciled before it stay
    /// written.
    ///
    /// # Errors
    ///
    /// Returns the first discovery, parse, diff or store error.
    pub fn import_all(&mut self, dir: &Path) -> SyncResult<SyncStats> {
        let mut stats = SyncStats::default();

        for note_type in note_types(dir)? {
            let note_type = note_type?;
            let outcome = self.import_note_type(&note_type)?;
            stats.record(&note_type.name, outcome);
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::model::note_type::tests::write_basic;
    use crate::model::DESCRIPTOR_FILE;
    use crate::storage::{NotetypeRecord, SqliteStorage};
    use std::fs;
    use tempfile::TempDir;

    fn tree_with(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (i, name) in names.iter().enumerate() {
            write_basic(&temp_dir.path().join(format!("nt{i}")), name, "normal");
        }
        temp_dir
    }

    #[test]
    fn test_create_new_note_types() {
        let tree = tree_with(&["Basic", "Reverse", "Vocab"]);
        let mut storage = SqliteStorage::open_memory().unwrap();

        let stats = Importer::new(&mut storage).import_all(tree.path()).unwrap();

        assert_eq!(stats.created, 3);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.summary(), "Added 3 new templates!");
        assert_eq!(storage.list_notetypes().unwrap().len(), 3);
    }

    #[test]
    fn test_created_record_matches_candidate() {
        let tree = tree_with(&["Basic"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        let candidate = NoteType::from_folder(&tree.path().join("nt0"))
            .unwrap()
            .to_record();
        let stored = storage.by_name("Basic").unwrap().unwrap();

        assert_eq!(stored.sortf, 0);
        assert_eq!(stored.flds, candidate.flds);
        assert_eq!(stored.tmpls, candidate.tmpls);
        assert_eq!(stored.css, candidate.css);
        assert!(!is_different(&stored, &candidate).unwrap());
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let tree = tree_with(&["Basic", "Vocab"]);
        let mut storage = SqliteStorage::open_memory().unwrap();

        Importer::new(&mut storage).import_all(tree.path()).unwrap();
        let stats = Importer::new(&mut storage).import_all(tree.path()).unwrap();

        assert_eq!(stats.created, 0);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn test_single_field_change_updates_once() {
        let tree = tree_with(&["Basic", "Vocab"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        fs::write(
            tree.path().join("nt0").join(DESCRIPTOR_FILE),
            r#"{"name": "Basic", "type": "normal", "sortFieldID": 1,
                "fields": [{"id": 1, "name": "Front"},
                           {"id": 2, "name": "Back", "description": "answer side", "collapsed": true}],
                "templates": [{"id": 1, "name": "Card 1"}]}"#,
        )
        .unwrap();

        let stats = Importer::new(&mut storage).import_all(tree.path()).unwrap();
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.summary(), "Updated 1 template!");
        assert!(storage.by_name("Basic").unwrap().unwrap().flds[1].collapsed);
    }

    #[test]
    fn test_template_body_change_updates() {
        let tree = tree_with(&["Basic"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        fs::write(tree.path().join("nt0").join("card_1_front.html"), "<b>{{Front}}</b>").unwrap();

        let stats = Importer::new(&mut storage).import_all(tree.path()).unwrap();
        assert_eq!(stats.updated, 1);
        assert_eq!(
            storage.by_name("Basic").unwrap().unwrap().tmpls[0].qfmt,
            "<b>{{Front}}</b>"
        );
    }

    #[test]
    fn test_reordered_fields_do_not_update() {
        let tree = tree_with(&["Basic"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        fs::write(
            tree.path().join("nt0").join(DESCRIPTOR_FILE),
            r#"{"name": "Basic", "type": "normal", "sortFieldID": 1,
                "fields": [{"id": 2, "name": "Back", "description": "answer side"},
                           {"id": 1, "name": "Front"}],
                "templates": [{"id": 1, "name": "Card 1"}]}"#,
        )
        .unwrap();

        let stats = Importer::new(&mut storage).import_all(tree.path()).unwrap();
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_update_preserves_id() {
        let tree = tree_with(&["Basic"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();
        let id_before = storage.by_name("Basic").unwrap().unwrap().id;

        fs::write(tree.path().join("nt0").join("style.css"), ".card { color: navy; }").unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        let stored = storage.by_name("Basic").unwrap().unwrap();
        assert_eq!(stored.id, id_before);
        assert_eq!(stored.css, ".card { color: navy; }");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tree = tree_with(&["Basic", "Vocab"]);
        let mut storage = SqliteStorage::open_memory().unwrap();

        let stats = Importer::new(&mut storage)
            .dry_run(true)
            .import_all(tree.path())
            .unwrap();

        assert_eq!(stats.created, 2);
        assert!(storage.list_notetypes().unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_ordinal_is_fatal() {
        let tree = tree_with(&["Basic"]);
        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_all(tree.path()).unwrap();

        fs::write(
            tree.path().join("nt0").join(DESCRIPTOR_FILE),
            r#"{"name": "Basic", "type": "normal", "sortFieldID": 1,
                "fields": [{"id": 1, "name": "Front"}, {"id": 3, "name": "Back"}],
                "templates": [{"id": 1, "name": "Card 1"}]}"#,
        )
        .unwrap();

        let result = Importer::new(&mut storage).import_all(tree.path());
        assert!(matches!(result, Err(SyncError::MatchIntegrity { ord: 2, .. })));
    }

    #[test]
    fn test_parse_error_aborts_before_later_writes() {
        let tree = tree_with(&["Basic", "Vocab"]);
        fs::write(tree.path().join("nt1").join(DESCRIPTOR_FILE), "{ not json").unwrap();
        let mut storage = SqliteStorage::open_memory().unwrap();

        let result = Importer::new(&mut storage).import_all(tree.path());

        assert!(matches!(result, Err(SyncError::SourceFormat { .. })));
        // Earlier note types stay applied.
        assert!(storage.by_name("Basic").unwrap().is_some());
        assert!(storage.by_name("Vocab").unwrap().is_none());
    }

    /// Store that accepts a fixed number of writes, then fails.
    struct FlakyStore {
        inner: SqliteStorage,
        writes_left: usize,
    }

    impl NotetypeStore for FlakyStore {
        fn by_name(&self, name: &str) -> Result<Option<NotetypeRecord>> {
            self.inner.by_name(name)
        }

        fn add(&mut self, record: &mut NotetypeRecord) -> Result<()> {
            if self.writes_left == 0 {
                return Err(Error::Other("collection is read-only".into()));
            }
            self.writes_left -= 1;
            self.inner.add(record)
        }

        fn save(&mut self, record: &mut NotetypeRecord) -> Result<()> {
            self.inner.save(record)
        }
    }

    #[test]
    fn test_store_failure_aborts_run() {
        let tree = tree_with(&["Basic", "Reverse", "Vocab"]);
        let mut store = FlakyStore {
            inner: SqliteStorage::open_memory().unwrap(),
            writes_left: 1,
        };

        let result = Importer::new(&mut store).import_all(tree.path());

        assert!(matches!(result, Err(SyncError::Store(_))));
        assert_eq!(store.inner.list_notetypes().unwrap().len(), 1);
    }
}
