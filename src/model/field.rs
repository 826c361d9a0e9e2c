//! Field model.

use serde::Deserialize;

use crate::storage::FieldRecord;

/// Font family every synced field is given.
pub const DEFAULT_FONT: &str = "Verdana";

/// Font size every synced field is given.
pub const DEFAULT_FONT_SIZE: u32 = 20;

/// A field entry of `model.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exclude_from_search: bool,
    #[serde(default)]
    pub collapsed: bool,
}

/// One input slot of a note type.
///
/// `id` is the 1-based ordinal from the source definition. Font, sticky,
/// right-to-left and plain-text settings cannot be expressed in the source
/// format, so they always carry the fixed defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub exclude_from_search: bool,
    pub collapsed: bool,
    pub sticky: bool,
    pub font_family: String,
    pub font_size: u32,
    pub rtl: bool,
    pub plain_text: bool,
}

impl From<FieldDescriptor> for Field {
    fn from(descriptor: FieldDescriptor) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            description: descriptor.description,
            exclude_from_search: descriptor.exclude_from_search,
            collapsed: descriptor.collapsed,
            sticky: false,
            font_family: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            rtl: false,
            plain_text: false,
        }
    }
}

impl Field {
    /// Store-native form; ordinal `k` becomes store order `k - 1`.
    #[must_use]
    pub fn to_record(&self) -> FieldRecord {
        FieldRecord {
            ord: self.id.saturating_sub(1),
            name: self.name.clone(),
            description: self.description.clone(),
            exclude_from_search: self.exclude_from_search,
            sticky: self.sticky,
            collapsed: self.collapsed,
            font: self.font_family.clone(),
            size: self.font_size,
            rtl: self.rtl,
            plain_text: self.plain_text,
        }
    }
}
