//! List command implementation.

use crate::cli::commands::open_configured;
use crate::error::Result;
use crate::storage::NotetypeSummary;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ListOutput {
    notetypes: Vec<NotetypeSummary>,
    count: usize,
}

/// List stored note types by name.
///
/// # Errors
///
/// Returns an error if the collection cannot be opened or queried.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (_, storage) = open_configured(db_path, None)?;
    let notetypes = storage.list_notetypes()?;

    if json {
        let output = ListOutput {
            count: notetypes.len(),
            notetypes,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if notetypes.is_empty() {
        println!("No note types stored.");
        return Ok(());
    }

    for notetype in &notetypes {
        let modified = Utc
            .timestamp_opt(notetype.modified, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<40} {modified}", notetype.name);
    }
    println!();
    println!("{} note types", notetypes.len());
    Ok(())
}
