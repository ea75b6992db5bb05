//! Layout tree node types: Document, Section, Row, Column, Element.
//!
//! The tree is a plain owned value (no arena, no shared pointers) so it can be
//! cloned, diffed and serialized as a whole. Every node carries a string id
//! that is unique across the document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::style::value::StyleBag;
use crate::tree::content::Content;

/// Errors from tree operations and document loading.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("unknown element type: {0}")]
    UnknownElementType(String),
    #[error("duplicate node id: {0}")]
    DuplicateId(String),
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four node kinds of the layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Section,
    Row,
    Column,
    Element,
}

impl NodeKind {
    /// Prefix used for generated ids of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Row => "row",
            NodeKind::Column => "col",
            NodeKind::Element => "el",
        }
    }
}

/// Section width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionWidth {
    #[default]
    Full,
    Wide,
    Medium,
    Small,
}

impl SectionWidth {
    /// The content max-width this class stands for.
    pub fn max_width(&self) -> &'static str {
        match self {
            SectionWidth::Full => "100%",
            SectionWidth::Wide => "1200px",
            SectionWidth::Medium => "960px",
            SectionWidth::Small => "720px",
        }
    }
}

/// Root aggregate: the ordered sections of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub width: SectionWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_width: Option<String>,
    #[serde(default)]
    pub style: StyleBag,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    /// Column layout key, e.g. `"1-1"`.
    pub layout: String,
    #[serde(default)]
    pub style: StyleBag,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    /// Relative width weight taken from the row's layout key.
    pub width: f64,
    #[serde(default)]
    pub style: StyleBag,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    /// Registry key of the element type, e.g. `"heading"`.
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub style: StyleBag,
    /// Stable DOM scoping key. Defaults to the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Section {
    pub fn new(id: impl Into<String>, width: SectionWidth) -> Self {
        Self {
            id: id.into(),
            width,
            custom_width: None,
            style: StyleBag::default(),
            rows: Vec::new(),
        }
    }
}

impl Row {
    pub fn new(id: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layout: layout.into(),
            style: StyleBag::default(),
            columns: Vec::new(),
        }
    }
}

impl Column {
    pub fn new(id: impl Into<String>, width: f64) -> Self {
        Self {
            id: id.into(),
            width,
            style: StyleBag::default(),
            elements: Vec::new(),
        }
    }
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type: element_type.into(),
            content: Content::default(),
            style: StyleBag::default(),
            anchor: None,
        }
    }

    /// The DOM scoping key: the explicit anchor, or the id.
    pub fn anchor(&self) -> &str {
        self.anchor.as_deref().unwrap_or(&self.id)
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.sections
            .iter()
            .flat_map(|s| &s.rows)
            .flat_map(|r| &r.columns)
            .flat_map(|c| &c.elements)
    }

    /// Find an element by id at any depth.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements().find(|e| e.id == id)
    }

    /// Every node id in pre-order (section, its rows, their columns, ...).
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for section in &self.sections {
            ids.push(section.id.as_str());
            for row in &section.rows {
                ids.push(row.id.as_str());
                for column in &row.columns {
                    ids.push(column.id.as_str());
                    ids.extend(column.elements.iter().map(|e| e.id.as_str()));
                }
            }
        }
        ids
    }

    /// Verify that no id appears twice.
    pub fn check_unique_ids(&self) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if !seen.insert(id) {
                return Err(TreeError::DuplicateId(id.to_owned()));
            }
        }
        Ok(())
    }

    /// Load a document from its JSON form, rejecting duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let doc: Document = serde_json::from_str(json)?;
        if let Err(err) = doc.check_unique_ids() {
            tracing::warn!(%err, "rejecting persisted document");
            return Err(err);
        }
        Ok(doc)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }
}
