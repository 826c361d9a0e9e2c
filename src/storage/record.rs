//! Store-native note type records.
//!
//! These are the dictionaries the collection store persists, keyed exactly
//! as the store spells them (`flds`, `tmpls`, `qfmt`, `sortf`, ...). The
//! whole record is kept as one JSON document per note type.

use serde::{Deserialize, Serialize};

/// A note type as the collection store holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotetypeRecord {
    /// Store-assigned id; 0 until the store has seen the record.
    pub id: i64,
    pub name: String,
    /// 0 for normal note types, 1 for cloze.
    #[serde(rename = "type")]
    pub kind: i32,
    /// Modification time in seconds.
    #[serde(rename = "mod")]
    pub modification_time: i64,
    pub usn: i32,
    /// Zero-based order of the sort field.
    pub sortf: u32,
    /// Default deck for new cards.
    pub did: Option<i64>,
    pub tmpls: Vec<TemplateRecord>,
    pub flds: Vec<FieldRecord>,
    pub css: String,
    #[serde(rename = "latexPre", default)]
    pub latex_pre: String,
    #[serde(rename = "latexPost", default)]
    pub latex_post: String,
    #[serde(default)]
    pub latexsvg: bool,
    /// Computed card requirements; opaque to this crate.
    #[serde(default)]
    pub req: Vec<serde_json::Value>,
    #[serde(rename = "originalStockKind", default)]
    pub original_stock_kind: i32,
}

/// One field of a stored note type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub ord: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "excludeFromSearch", default)]
    pub exclude_from_search: bool,
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub collapsed: bool,
    pub font: String,
    pub size: u32,
    #[serde(default)]
    pub rtl: bool,
    #[serde(rename = "plainText", default)]
    pub plain_text: bool,
}

/// One card template of a stored note type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub ord: u32,
    pub name: String,
    pub qfmt: String,
    pub afmt: String,
    #[serde(default)]
    pub bqfmt: String,
    #[serde(default)]
    pub bafmt: String,
    #[serde(default)]
    pub bfont: String,
    #[serde(default)]
    pub bsize: u32,
    /// Deck override for cards generated from this template.
    #[serde(default)]
    pub did: Option<i64>,
}
