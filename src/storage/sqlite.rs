//! SQLite storage implementation.
//!
//! This module provides the collection store backend using SQLite.
//! It follows the MutationContext pattern for transaction discipline and audit logging.

use crate::error::{Error, Result};
use crate::storage::events::{get_events, insert_event, Event, EventType};
use crate::storage::record::NotetypeRecord;
use crate::storage::schema::apply_schema;
use crate::storage::NotetypeStore;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

const NOTETYPE_ENTITY: &str = "notetype";

/// Update sequence number marking a local change not yet pushed upstream.
const LOCAL_USN: i32 = -1;

/// SQLite-based collection store.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    actor: String,
}

/// Context for a mutation operation, collecting audit events.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Actor performing the operation.
    pub actor: String,
    /// Events to write at the end of the transaction.
    pub events: Vec<Event>,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str, actor: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            actor: actor.to_string(),
            events: Vec::new(),
        }
    }

    /// Record an event for this operation.
    pub fn record_event(&mut self, entity_type: &str, entity_id: &str, event_type: EventType) {
        self.events
            .push(Event::new(entity_type, entity_id, event_type, &self.actor).with_comment(&self.op_name));
    }
}

/// Row of `list_notetypes`.
#[derive(Debug, Clone, Serialize)]
pub struct NotetypeSummary {
    pub id: i64,
    pub name: String,
    /// Modification time in seconds.
    pub modified: i64,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self {
            conn,
            actor: "template-sync".to_string(),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            actor: "template-sync".to_string(),
        })
    }

    /// Set the actor recorded on audit events.
    #[must_use]
    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = actor.to_string();
        self
    }

    /// Execute a mutation with the transaction protocol.
    ///
    /// This method:
    /// 1. Begins an IMMEDIATE transaction (for write locking)
    /// 2. Executes the mutation closure
    /// 3. Writes audit events
    /// 4. Commits (or rolls back on error)
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op, &self.actor);

        let result = f(&tx, &mut ctx)?;

        for event in &ctx.events {
            insert_event(&tx, event)?;
        }

        tx.commit()?;

        Ok(result)
    }

    /// List stored note types ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notetypes(&self) -> Result<Vec<NotetypeSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, mtime_secs FROM notetypes ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(NotetypeSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                modified: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Audit events for one note type, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn notetype_events(&self, id: i64, limit: Option<u32>) -> Result<Vec<Event>> {
        Ok(get_events(&self.conn, NOTETYPE_ENTITY, &id.to_string(), limit)?)
    }
}

/// Next free note type id: the current time in milliseconds, bumped past
/// any id already taken.
fn next_notetype_id(tx: &Transaction) -> Result<i64> {
    let max_id: Option<i64> = tx.query_row("SELECT MAX(id) FROM notetypes", [], |row| row.get(0))?;
    let now = chrono::Utc::now().timestamp_millis();
    Ok(max_id.map_or(now, |max| now.max(max + 1)))
}

impl NotetypeStore for SqliteStorage {
    fn by_name(&self, name: &str) -> Result<Option<NotetypeRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, mtime_secs, usn, config FROM notetypes WHERE name = ?1",
                [name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i32>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, mtime, usn, config)) = row else {
            return Ok(None);
        };

        let mut record: NotetypeRecord = serde_json::from_str(&config)?;
        record.id = id;
        record.modification_time = mtime;
        record.usn = usn;
        Ok(Some(record))
    }

    fn add(&mut self, record: &mut NotetypeRecord) -> Result<()> {
        // The caller's record only changes once the write has committed.
        let stored = self.mutate("notetype_add", |tx, ctx| {
            let mut stored = record.clone();
            stored.id = next_notetype_id(tx)?;
            stored.modification_time = chrono::Utc::now().timestamp();
            stored.usn = LOCAL_USN;
            let config = serde_json::to_string(&stored)?;

            tx.execute(
                "INSERT INTO notetypes (id, name, mtime_secs, usn, config) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    stored.id,
                    stored.name,
                    stored.modification_time,
                    stored.usn,
                    config,
                ],
            )?;

            ctx.record_event(NOTETYPE_ENTITY, &stored.id.to_string(), EventType::NotetypeCreated);
            Ok(stored)
        })?;

        *record = stored;
        Ok(())
    }

    fn save(&mut self, record: &mut NotetypeRecord) -> Result<()> {
        let stored = self.mutate("notetype_save", |tx, ctx| {
            let mut stored = record.clone();
            stored.modification_time = chrono::Utc::now().timestamp();
            stored.usn = LOCAL_USN;
            let config = serde_json::to_string(&stored)?;

            let updated = tx.execute(
                "UPDATE notetypes SET name = ?2, mtime_secs = ?3, usn = ?4, config = ?5 WHERE id = ?1",
                rusqlite::params![
                    stored.id,
                    stored.name,
                    stored.modification_time,
                    stored.usn,
                    config,
                ],
            )?;

            if updated == 0 {
                return Err(Error::NotetypeNotFound {
                    name: stored.name.clone(),
                });
            }

            ctx.record_event(NOTETYPE_ENTITY, &stored.id.to_string(), EventType::NotetypeUpdated);
            Ok(stored)
        })?;

        *record = stored;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::{FieldRecord, TemplateRecord};
    use tempfile::TempDir;

    fn make_record(name: &str) -> NotetypeRecord {
        NotetypeRecord {
            id: 0,
            name: name.to_string(),
            kind: 0,
            modification_time: 0,
            usn: 0,
            sortf: 0,
            did: None,
            tmpls: vec![TemplateRecord {
                ord: 0,
                name: "Card 1".into(),
                qfmt: "{{Front}}".into(),
                afmt: "{{Back}}".into(),
                bqfmt: String::new(),
                bafmt: String::new(),
                bfont: String::new(),
                bsize: 0,
                did: None,
            }],
            flds: vec![FieldRecord {
                ord: 0,
                name: "Front".into(),
                description: String::new(),
                exclude_from_search: false,
                sticky: false,
                collapsed: false,
                font: "Verdana".into(),
                size: 20,
                rtl: false,
                plain_text: false,
            }],
            css: ".card {}".into(),
            latex_pre: String::new(),
            latex_post: String::new(),
            latexsvg: true,
            req: vec![],
            original_stock_kind: 1,
        }
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("data").join("collection.db");

        SqliteStorage::open(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_add_assigns_identity() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut record = make_record("Basic");

        storage.add(&mut record).unwrap();

        assert!(record.id > 0);
        assert!(record.modification_time > 0);
        assert_eq!(record.usn, -1);

        let stored = storage.by_name("Basic").unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_add_never_reuses_ids() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut first = make_record("Basic");
        let mut second = make_record("Cloze");

        storage.add(&mut first).unwrap();
        storage.add(&mut second).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_add_duplicate_name_fails() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add(&mut make_record("Basic")).unwrap();

        let mut duplicate = make_record("Basic");
        let result = storage.add(&mut duplicate);
        assert!(matches!(result, Err(Error::Database(_))));

        // A rejected insert leaves the caller's record as it was.
        assert_eq!(duplicate, make_record("Basic"));
        assert_eq!(duplicate.id, 0);
        assert_eq!(duplicate.usn, 0);
    }

    #[test]
    fn test_by_name_absent() {
        let storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.by_name("Missing").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_content_keeps_id() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut record = make_record("Basic");
        storage.add(&mut record).unwrap();
        let id = record.id;

        let mut changed = make_record("Basic");
        changed.id = id;
        changed.css = ".card { color: red; }".into();
        storage.save(&mut changed).unwrap();

        let stored = storage.by_name("Basic").unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.css, ".card { color: red; }");
        assert_eq!(storage.list_notetypes().unwrap().len(), 1);
    }

    #[test]
    fn test_save_unknown_id_fails() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut record = make_record("Ghost");
        record.id = 42;

        let result = storage.save(&mut record);
        assert!(matches!(result, Err(Error::NotetypeNotFound { .. })));
        assert_eq!(record.usn, 0);
        assert_eq!(record.modification_time, 0);
    }

    #[test]
    fn test_writes_are_audited() {
        let mut storage = SqliteStorage::open_memory().unwrap().with_actor("ci");
        let mut record = make_record("Basic");
        storage.add(&mut record).unwrap();
        storage.save(&mut record).unwrap();

        let events = storage.notetype_events(record.id, None).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.actor == "ci"));
        assert!(events.iter().any(|e| e.event_type == EventType::NotetypeCreated));
        assert!(events.iter().any(|e| e.event_type == EventType::NotetypeUpdated));
    }

    #[test]
    fn test_list_notetypes_sorted() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add(&mut make_record("Cloze")).unwrap();
        storage.add(&mut make_record("Basic")).unwrap();

        let names: Vec<_> = storage
            .list_notetypes()
            .unwrap()
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["Basic", "Cloze"]);
    }
}
