//! Show command implementation.

use crate::cli::commands::open_configured;
use crate::error::{Error, Result};
use crate::storage::NotetypeStore;
use chrono::{TimeZone, Utc};
use std::path::PathBuf;

/// Print one stored note type in its store-native JSON form.
///
/// # Errors
///
/// Returns `Error::NotetypeNotFound` if no note type has that name.
pub fn execute(name: &str, history: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (_, storage) = open_configured(db_path, None)?;
    let record = storage
        .by_name(name)?
        .ok_or_else(|| Error::NotetypeNotFound {
            name: name.to_string(),
        })?;

    let events = if history {
        Some(storage.notetype_events(record.id, Some(20))?)
    } else {
        None
    };

    if json {
        let output = serde_json::json!({
            "notetype": record,
            "history": events,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    if let Some(events) = events {
        println!();
        for event in events {
            let when = Utc
                .timestamp_millis_opt(event.created_at)
                .single()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!("{when}  {:<17} {}", event.event_type.as_str(), event.actor);
        }
    }
    Ok(())
}
