//! Card template model.

use std::path::Path;

use serde::Deserialize;

use crate::model::read_source;
use crate::storage::TemplateRecord;
use crate::sync::SyncResult;

/// A template entry of `model.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub front_file: Option<String>,
    #[serde(default)]
    pub back_file: Option<String>,
}

impl TemplateDescriptor {
    /// File holding the question body, `card_<id>_front.html` unless overridden.
    #[must_use]
    pub fn front_file(&self) -> String {
        self.front_file
            .clone()
            .unwrap_or_else(|| format!("card_{}_front.html", self.id))
    }

    /// File holding the answer body, `card_<id>_back.html` unless overridden.
    #[must_use]
    pub fn back_file(&self) -> String {
        self.back_file
            .clone()
            .unwrap_or_else(|| format!("card_{}_back.html", self.id))
    }
}

/// One card-rendering definition.
///
/// Question and answer bodies are opaque template text, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: u32,
    pub name: String,
    pub question: String,
    pub answer: String,
    pub browser_question: String,
    pub browser_answer: String,
    pub browser_font: String,
    pub browser_font_size: u32,
    pub deck_override: Option<i64>,
}

impl Template {
    /// Build a template, reading its bodies from `folder`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::SourceFormat` if either body file is missing.
    pub fn from_descriptor(descriptor: &TemplateDescriptor, folder: &Path) -> SyncResult<Self> {
        let question = read_source(&folder.join(descriptor.front_file()))?;
        let answer = read_source(&folder.join(descriptor.back_file()))?;

        Ok(Self {
            id: descriptor.id,
            name: descriptor.name.clone(),
            question,
            answer,
            browser_question: String::new(),
            browser_answer: String::new(),
            browser_font: String::new(),
            browser_font_size: 0,
            deck_override: None,
        })
    }

    #[must_use]
    pub fn to_record(&self) -> TemplateRecord {
        TemplateRecord {
            ord: self.id.saturating_sub(1),
            name: self.name.clone(),
            qfmt: self.question.clone(),
            afmt: self.answer.clone(),
            bqfmt: self.browser_question.clone(),
            bafmt: self.browser_answer.clone(),
            bfont: self.browser_font.clone(),
            bsize: self.browser_font_size,
            did: self.deck_override,
        }
    }
}
