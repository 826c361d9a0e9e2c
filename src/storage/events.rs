//! Audit event storage and retrieval.
//!
//! Every store write records who changed which note type and when.

use rusqlite::types::Type;
use rusqlite::{Connection, Result};
use serde::Serialize;

/// Event types for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    NotetypeCreated,
    NotetypeUpdated,
}

impl EventType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotetypeCreated => "notetype_created",
            Self::NotetypeUpdated => "notetype_updated",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "notetype_created" => Some(Self::NotetypeCreated),
            "notetype_updated" => Some(Self::NotetypeUpdated),
            _ => None,
        }
    }
}

/// A stored `event_type` this build does not know.
#[derive(Debug, thiserror::Error)]
#[error("unknown event type: {0}")]
struct UnknownEventType(String);

/// An audit event record.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub event_type: EventType,
    pub actor: String,
    pub comment: Option<String>,
    pub created_at: i64,
}

impl Event {
    /// Create a new event (id will be assigned by database).
    #[must_use]
    pub fn new(entity_type: &str, entity_id: &str, event_type: EventType, actor: &str) -> Self {
        Self {
            id: 0,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            event_type,
            actor: actor.to_string(),
            comment: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Add a comment to the event.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// Insert an event into the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(conn: &Connection, event: &Event) -> Result<i64> {
    conn.execute(
        "INSERT INTO events (entity_type, entity_id, event_type, actor, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            event.entity_type,
            event.entity_id,
            event.event_type.as_str(),
            event.actor,
            event.comment,
            event.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get events for an entity, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_events(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
    limit: Option<u32>,
) -> Result<Vec<Event>> {
    let limit = limit.unwrap_or(100);
    let mut stmt = conn.prepare(
        "SELECT id, entity_type, entity_id, event_type, actor, comment, created_at
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY created_at DESC, id DESC
         LIMIT ?3",
    )?;

    let rows = stmt.query_map(rusqlite::params![entity_type, entity_id, limit], |row| {
        let raw: String = row.get(3)?;
        let event_type = EventType::parse(&raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(UnknownEventType(raw.clone())))
        })?;

        Ok(Event {
            id: row.get(0)?,
            entity_type: row.get(1)?,
            entity_id: row.get(2)?,
            event_type,
            actor: row.get(4)?,
            comment: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::apply_schema;

    #[test]
    fn test_event_insert_and_get() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let event = Event::new("notetype", "1700000000000", EventType::NotetypeCreated, "test-actor")
            .with_comment("Basic");

        let id = insert_event(&conn, &event).unwrap();
        assert!(id > 0);

        let events = get_events(&conn, "notetype", "1700000000000", Some(10)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor, "test-actor");
        assert_eq!(events[0].event_type, EventType::NotetypeCreated);
        assert_eq!(events[0].comment, Some("Basic".to_string()));
    }

    #[test]
    fn test_unknown_event_type_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO events (entity_type, entity_id, event_type, actor, created_at)
             VALUES ('notetype', '7', 'notetype_deleted', 'someone', 0)",
            [],
        )
        .unwrap();

        let err = get_events(&conn, "notetype", "7", None).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _)));
        assert!(err.to_string().contains("notetype_deleted"));
    }

    #[test]
    fn test_event_type_names_parse_back() {
        for event_type in [EventType::NotetypeCreated, EventType::NotetypeUpdated] {
            assert_eq!(EventType::parse(event_type.as_str()), Some(event_type));
        }
        assert_eq!(EventType::parse("NotetypeCreated"), None);
    }
}
