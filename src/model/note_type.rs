//! Note type model.
//!
//! A note type is parsed from one folder of the template repository:
//! `model.json` plus the style sheet and per-card HTML files it references.
//! Store-assigned identity (id, mtime, usn, deck, requirements) starts out
//! neutral and only ever comes from an existing store record.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::model::field::{Field, FieldDescriptor};
use crate::model::read_source;
use crate::model::template::{Template, TemplateDescriptor};
use crate::storage::NotetypeRecord;
use crate::sync::{SyncError, SyncResult};

/// Name of the metadata descriptor inside each note type folder.
pub const DESCRIPTOR_FILE: &str = "model.json";

/// Style sheet read when the descriptor names none.
pub const DEFAULT_CSS_FILE: &str = "style.css";

/// Normal or cloze note type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Normal,
    Cloze,
}

impl NoteKind {
    /// Numeric kind code stored in the record's `type` key.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Cloze => 1,
        }
    }
}

/// Contents of `model.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteTypeDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default)]
    pub css_file: Option<String>,
    #[serde(rename = "sortFieldID")]
    pub sort_field_id: u32,
    #[serde(default)]
    pub latex_pre: String,
    #[serde(default)]
    pub latex_post: String,
    pub fields: Vec<FieldDescriptor>,
    pub templates: Vec<TemplateDescriptor>,
}

/// The full schema of one note type.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteType {
    pub name: String,
    pub css: String,
    pub fields: Vec<Field>,
    /// Ordinal of the field used for sorting.
    pub sort_field_id: u32,
    pub templates: Vec<Template>,
    pub kind: NoteKind,
    pub latex_pre: String,
    pub latex_post: String,
    pub latex_svg: bool,

    pub id: i64,
    pub modification_time: i64,
    pub update_sequence_number: i32,
    pub default_deck_id: Option<i64>,
    pub required_fields: Vec<serde_json::Value>,
    pub original_stock_kind: i32,
}

impl NoteType {
    /// Parse the note type defined in `folder`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::SourceFormat` if `model.json` or any file it
    /// references is missing or malformed.
    pub fn from_folder(folder: &Path) -> SyncResult<Self> {
        let descriptor_path = folder.join(DESCRIPTOR_FILE);
        let raw = read_source(&descriptor_path)?;
        let descriptor: NoteTypeDescriptor =
            serde_json::from_str(&raw).map_err(|e| SyncError::SourceFormat {
                path: descriptor_path.clone(),
                message: e.to_string(),
            })?;

        Self::from_descriptor(descriptor, folder)
    }

    /// Build a note type from an already parsed descriptor.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::SourceFormat` if ordinals are zero or repeated,
    /// the sort field names no field, or a referenced file is missing.
    pub fn from_descriptor(descriptor: NoteTypeDescriptor, folder: &Path) -> SyncResult<Self> {
        let descriptor_path = folder.join(DESCRIPTOR_FILE);
        let invalid = |message: String| SyncError::SourceFormat {
            path: descriptor_path.clone(),
            message,
        };

        check_ordinals(descriptor.fields.iter().map(|f| f.id), "field").map_err(&invalid)?;
        check_ordinals(descriptor.templates.iter().map(|t| t.id), "template").map_err(&invalid)?;
        if !descriptor
            .fields
            .iter()
            .any(|f| f.id == descriptor.sort_field_id)
        {
            return Err(invalid(format!(
                "sortFieldID {} does not name a field",
                descriptor.sort_field_id
            )));
        }

        let css_file = descriptor.css_file.as_deref().unwrap_or(DEFAULT_CSS_FILE);
        let css = read_source(&folder.join(css_file))?;

        let templates = descriptor
            .templates
            .iter()
            .map(|t| Template::from_descriptor(t, folder))
            .collect::<SyncResult<Vec<_>>>()?;

        Ok(Self {
            name: descriptor.name,
            css,
            fields: descriptor.fields.into_iter().map(Field::from).collect(),
            sort_field_id: descriptor.sort_field_id,
            templates,
            kind: descriptor.kind,
            latex_pre: descriptor.latex_pre,
            latex_post: descriptor.latex_post,
            latex_svg: true,
            id: 0,
            modification_time: 0,
            update_sequence_number: 0,
            default_deck_id: None,
            required_fields: Vec::new(),
            original_stock_kind: 1,
        })
    }

    /// Store-native dictionary form of this note type.
    #[must_use]
    pub fn to_record(&self) -> NotetypeRecord {
        NotetypeRecord {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.code(),
            modification_time: self.modification_time,
            usn: self.update_sequence_number,
            sortf: self.sort_field_id.saturating_sub(1),
            did: self.default_deck_id,
            tmpls: self.templates.iter().map(Template::to_record).collect(),
            flds: self.fields.iter().map(Field::to_record).collect(),
            css: self.css.clone(),
            latex_pre: self.latex_pre.clone(),
            latex_post: self.latex_post.clone(),
            latexsvg: self.latex_svg,
            req: self.required_fields.clone(),
            original_stock_kind: self.original_stock_kind,
        }
    }
}

/// Ordinals are 1-based and unique within their list.
fn check_ordinals(ids: impl Iterator<Item = u32>, kind: &str) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if id == 0 {
            return Err(format!("{kind} id must be 1 or greater"));
        }
        if !seen.insert(id) {
            return Err(format!("duplicate {kind} id {id}"));
        }
    }
    Ok(())
}
