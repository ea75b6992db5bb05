//! Structural CRUD over the layout tree.
//!
//! Every operation takes the current document by reference and returns a new
//! one; the input is never touched. Containers are addressed by their path of
//! ids, elements by id alone (the whole tree is searched). A missing target is
//! a silent no-op: the returned document equals the input. That keeps every
//! operation safe to replay from an editor's undo/redo stack.

use tracing::debug;

use crate::id::IdGenerator;
use crate::registry::editor::ElementTypes;
use crate::style::value::StyleBag;
use crate::tree::clone::{clone_column, clone_element, clone_row, clone_section};
use crate::tree::content::Content;
use crate::tree::layout::column_weights;
use crate::tree::node::{Column, Document, Element, NodeKind, Row, Section, SectionWidth, TreeError};

/// A partial update for one element, as produced by a renderer's
/// `on_update` callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    /// Keys merged into the existing content.
    pub content: Option<Content>,
    /// Replacement style bag. Style bags are always replaced whole.
    pub style: Option<StyleBag>,
    /// New anchor.
    pub anchor: Option<String>,
}

impl ElementUpdate {
    /// An update that merges `content` keys.
    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// An update that replaces the style bag.
    pub fn style(style: StyleBag) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.style.is_none() && self.anchor.is_none()
    }

    fn apply(&self, element: &mut Element) {
        if let Some(content) = &self.content {
            element.content.merge(content);
        }
        if let Some(style) = &self.style {
            element.style = style.clone();
        }
        if let Some(anchor) = &self.anchor {
            element.anchor = Some(anchor.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation helpers
// ---------------------------------------------------------------------------

fn edit_section(doc: &Document, section_id: &str, edit: impl FnOnce(&mut Section)) -> Document {
    let mut next = doc.clone();
    match next.sections.iter_mut().find(|s| s.id == section_id) {
        Some(section) => edit(section),
        None => debug!(section_id, "section not found; document unchanged"),
    }
    next
}

fn edit_row(doc: &Document, section_id: &str, row_id: &str, edit: impl FnOnce(&mut Row)) -> Document {
    edit_section(doc, section_id, |section| {
        match section.rows.iter_mut().find(|r| r.id == row_id) {
            Some(row) => edit(row),
            None => debug!(section_id, row_id, "row not found; document unchanged"),
        }
    })
}

fn edit_column(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    column_id: &str,
    edit: impl FnOnce(&mut Column),
) -> Document {
    edit_row(doc, section_id, row_id, |row| {
        match row.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => edit(column),
            None => debug!(row_id, column_id, "column not found; document unchanged"),
        }
    })
}

/// Run `edit` on the column holding `element_id`, wherever it is.
fn edit_column_holding(
    doc: &Document,
    element_id: &str,
    edit: impl FnOnce(&mut Column, usize),
) -> Document {
    let mut next = doc.clone();
    let found = next
        .sections
        .iter_mut()
        .flat_map(|s| s.rows.iter_mut())
        .flat_map(|r| r.columns.iter_mut())
        .find_map(|column| {
            let index = column.elements.iter().position(|e| e.id == element_id)?;
            Some((column, index))
        });
    match found {
        Some((column, index)) => edit(column, index),
        None => debug!(element_id, "element not found; document unchanged"),
    }
    next
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Append a new empty section.
pub fn add_section(doc: &Document, width: SectionWidth, ids: &mut impl IdGenerator) -> Document {
    let mut next = doc.clone();
    next.sections
        .push(Section::new(ids.next_id(NodeKind::Section), width));
    next
}

/// Remove a section and everything in it.
pub fn delete_section(doc: &Document, section_id: &str) -> Document {
    let mut next = doc.clone();
    let before = next.sections.len();
    next.sections.retain(|s| s.id != section_id);
    if next.sections.len() == before {
        debug!(section_id, "section not found; document unchanged");
    }
    next
}

/// Insert a deep copy of a section, with fresh ids throughout, right after it.
pub fn duplicate_section(doc: &Document, section_id: &str, ids: &mut impl IdGenerator) -> Document {
    let mut next = doc.clone();
    match next.sections.iter().position(|s| s.id == section_id) {
        Some(index) => {
            let copy = clone_section(&next.sections[index], ids);
            next.sections.insert(index + 1, copy);
        }
        None => debug!(section_id, "section not found; document unchanged"),
    }
    next
}

/// Replace a section's style bag.
pub fn update_section_style(doc: &Document, section_id: &str, style: StyleBag) -> Document {
    edit_section(doc, section_id, |section| section.style = style)
}

/// Change a section's width class and custom width.
pub fn set_section_width(
    doc: &Document,
    section_id: &str,
    width: SectionWidth,
    custom_width: Option<String>,
) -> Document {
    edit_section(doc, section_id, |section| {
        section.width = width;
        section.custom_width = custom_width;
    })
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Append a row whose columns follow `layout_key`. Unknown keys are a no-op.
pub fn add_row(
    doc: &Document,
    section_id: &str,
    layout_key: &str,
    ids: &mut impl IdGenerator,
) -> Document {
    let Some(weights) = column_weights(layout_key) else {
        debug!(layout_key, "unknown layout key; document unchanged");
        return doc.clone();
    };
    edit_section(doc, section_id, |section| {
        let mut row = Row::new(ids.next_id(NodeKind::Row), layout_key.trim());
        row.columns = weights
            .iter()
            .map(|&weight| Column::new(ids.next_id(NodeKind::Column), weight))
            .collect();
        section.rows.push(row);
    })
}

pub fn delete_row(doc: &Document, section_id: &str, row_id: &str) -> Document {
    edit_section(doc, section_id, |section| {
        let before = section.rows.len();
        section.rows.retain(|r| r.id != row_id);
        if section.rows.len() == before {
            debug!(section_id, row_id, "row not found; document unchanged");
        }
    })
}

/// Insert a deep copy of a row right after it.
pub fn duplicate_row(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    ids: &mut impl IdGenerator,
) -> Document {
    edit_section(doc, section_id, |section| {
        match section.rows.iter().position(|r| r.id == row_id) {
            Some(index) => {
                let copy = clone_row(&section.rows[index], ids);
                section.rows.insert(index + 1, copy);
            }
            None => debug!(section_id, row_id, "row not found; document unchanged"),
        }
    })
}

pub fn update_row_style(doc: &Document, section_id: &str, row_id: &str, style: StyleBag) -> Document {
    edit_row(doc, section_id, row_id, |row| row.style = style)
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Append an empty column of weight 1 to a row.
pub fn add_column(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    ids: &mut impl IdGenerator,
) -> Document {
    edit_row(doc, section_id, row_id, |row| {
        row.columns
            .push(Column::new(ids.next_id(NodeKind::Column), 1.0));
    })
}

pub fn delete_column(doc: &Document, section_id: &str, row_id: &str, column_id: &str) -> Document {
    edit_row(doc, section_id, row_id, |row| {
        let before = row.columns.len();
        row.columns.retain(|c| c.id != column_id);
        if row.columns.len() == before {
            debug!(row_id, column_id, "column not found; document unchanged");
        }
    })
}

/// Insert a deep copy of a column (same weight) right after it.
pub fn duplicate_column(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    column_id: &str,
    ids: &mut impl IdGenerator,
) -> Document {
    edit_row(doc, section_id, row_id, |row| {
        match row.columns.iter().position(|c| c.id == column_id) {
            Some(index) => {
                let copy = clone_column(&row.columns[index], ids);
                row.columns.insert(index + 1, copy);
            }
            None => debug!(row_id, column_id, "column not found; document unchanged"),
        }
    })
}

pub fn update_column_style(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    column_id: &str,
    style: StyleBag,
) -> Document {
    edit_column(doc, section_id, row_id, column_id, |column| column.style = style)
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// Append a new element of `element_type` to a column.
///
/// The element starts with a copy of the type's default content and styles.
/// An unknown type is reported as [`TreeError::UnknownElementType`]; a missing
/// container is a silent no-op like every other structural miss.
pub fn add_element(
    doc: &Document,
    section_id: &str,
    row_id: &str,
    column_id: &str,
    element_type: &str,
    registry: &impl ElementTypes,
    ids: &mut impl IdGenerator,
) -> Result<Document, TreeError> {
    let definition = registry
        .element_type(element_type)
        .ok_or_else(|| TreeError::UnknownElementType(element_type.to_owned()))?;
    Ok(edit_column(doc, section_id, row_id, column_id, |column| {
        let element = definition.instantiate(ids.next_id(NodeKind::Element));
        column.elements.push(element);
    }))
}

/// Apply a partial update to an element found anywhere in the tree.
pub fn update_element(doc: &Document, element_id: &str, update: &ElementUpdate) -> Document {
    edit_column_holding(doc, element_id, |column, index| {
        update.apply(&mut column.elements[index]);
    })
}

/// Remove an element found anywhere in the tree.
pub fn delete_element(doc: &Document, element_id: &str) -> Document {
    edit_column_holding(doc, element_id, |column, index| {
        column.elements.remove(index);
    })
}

/// Insert a copy of an element, under a new id, right after it.
pub fn duplicate_element(doc: &Document, element_id: &str, ids: &mut impl IdGenerator) -> Document {
    edit_column_holding(doc, element_id, |column, index| {
        let copy = clone_element(&column.elements[index], ids);
        column.elements.insert(index + 1, copy);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use crate::registry::editor::EditorRegistry;
    use crate::style::device::Device;
    use pretty_assertions::assert_eq;

    /// Build:
    /// ```text
    /// section_1
    ///   row_2 (1-1)
    ///     col_3 -> el_5 (heading)
    ///     col_4
    /// ```
    fn build() -> (Document, SequentialIds, EditorRegistry) {
        let registry = EditorRegistry::with_builtins();
        let mut ids = SequentialIds::new();
        let doc = add_section(&Document::new(), SectionWidth::Wide, &mut ids);
        let doc = add_row(&doc, "section_1", "1-1", &mut ids);
        let doc = add_element(&doc, "section_1", "row_2", "col_3", "heading", &registry, &mut ids)
            .unwrap();
        (doc, ids, registry)
    }

    #[test]
    fn add_section_appends_empty() {
        let mut ids = SequentialIds::new();
        let doc = add_section(&Document::new(), SectionWidth::Small, &mut ids);
        let doc = add_section(&doc, SectionWidth::Full, &mut ids);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].width, SectionWidth::Small);
        assert_eq!(doc.sections[1].id, "section_2");
        assert!(doc.sections[1].rows.is_empty());
        assert!(doc.sections[1].style.is_empty());
    }

    #[test]
    fn input_document_is_untouched() {
        let (doc, mut ids, _) = build();
        let snapshot = doc.clone();
        let _ = delete_section(&doc, "section_1");
        let _ = duplicate_section(&doc, "section_1", &mut ids);
        let _ = update_element(&doc, "el_5", &ElementUpdate::content(Content::new().with("text", "x")));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn delete_missing_section_is_noop() {
        let (doc, ..) = build();
        assert_eq!(delete_section(&doc, "nope"), doc);
    }

    #[test]
    fn delete_section_removes_it() {
        let (doc, ..) = build();
        assert!(delete_section(&doc, "section_1").sections.is_empty());
    }

    #[test]
    fn add_row_uses_layout_weights() {
        let (doc, ..) = build();
        let row = &doc.sections[0].rows[0];
        assert_eq!(row.layout, "1-1");
        let weights: Vec<f64> = row.columns.iter().map(|c| c.width).collect();
        assert_eq!(weights, vec![1.0, 1.0]);
        assert_eq!(row.columns[0].id, "col_3");
        assert_eq!(row.columns[1].id, "col_4");
    }

    #[test]
    fn add_row_unknown_layout_or_section_is_noop() {
        let (doc, mut ids, _) = build();
        assert_eq!(add_row(&doc, "section_1", "9-9-9", &mut ids), doc);
        assert_eq!(add_row(&doc, "missing", "1", &mut ids), doc);
    }

    #[test]
    fn delete_row() {
        let (doc, ..) = build();
        let next = super::delete_row(&doc, "section_1", "row_2");
        assert!(next.sections[0].rows.is_empty());
        assert_eq!(super::delete_row(&doc, "section_1", "row_x"), doc);
    }

    #[test]
    fn add_element_copies_defaults() {
        let (doc, _, registry) = build();
        let element = doc.element("el_5").unwrap();
        assert_eq!(element.element_type, "heading");
        let defaults = registry.get("heading").unwrap();
        assert_eq!(element.content, defaults.default_content);
    }

    #[test]
    fn add_element_unknown_type_is_error() {
        let (doc, mut ids, registry) = build();
        let result = add_element(&doc, "section_1", "row_2", "col_3", "hologram", &registry, &mut ids);
        assert!(matches!(result, Err(TreeError::UnknownElementType(t)) if t == "hologram"));
    }

    #[test]
    fn add_element_missing_column_is_noop() {
        let (doc, mut ids, registry) = build();
        let next = add_element(&doc, "section_1", "row_2", "col_99", "text", &registry, &mut ids).unwrap();
        assert_eq!(next, doc);
    }

    #[test]
    fn update_element_merges_content_and_replaces_style() {
        let (doc, ..) = build();
        let style = StyleBag::new().with("color", "red");
        let update = ElementUpdate {
            content: Some(Content::new().with("text", "New title")),
            style: Some(style.clone()),
            anchor: None,
        };
        let next = update_element(&doc, "el_5", &update);
        let element = next.element("el_5").unwrap();
        assert_eq!(element.content.text("text"), Some("New title"));
        assert_eq!(element.style, style);
    }

    #[test]
    fn update_and_delete_find_deep_elements_by_id_alone() {
        let (doc, mut ids, registry) = build();
        let doc = add_section(&doc, SectionWidth::Full, &mut ids); // section_6
        let doc = add_row(&doc, "section_6", "1-2", &mut ids); // row_7, col_8, col_9
        let doc = add_element(&doc, "section_6", "row_7", "col_9", "text", &registry, &mut ids)
            .unwrap(); // el_10
        let next = update_element(
            &doc,
            "el_10",
            &ElementUpdate::content(Content::new().with("text", "deep")),
        );
        assert_eq!(next.element("el_10").unwrap().content.text("text"), Some("deep"));

        let next = delete_element(&next, "el_10");
        assert!(next.element("el_10").is_none());
        assert!(next.element("el_5").is_some());
    }

    #[test]
    fn missing_element_is_noop() {
        let (doc, mut ids, _) = build();
        assert_eq!(update_element(&doc, "ghost", &ElementUpdate::default()), doc);
        assert_eq!(delete_element(&doc, "ghost"), doc);
        assert_eq!(duplicate_element(&doc, "ghost", &mut ids), doc);
    }

    #[test]
    fn duplicate_section_inserts_after_with_fresh_ids() {
        let (doc, mut ids, _) = build();
        let doc = add_section(&doc, SectionWidth::Small, &mut ids); // section_6
        let next = duplicate_section(&doc, "section_1", &mut ids);
        let order: Vec<&str> = next.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["section_1", "section_7", "section_6"]);
        next.check_unique_ids().unwrap();

        let source: Vec<&str> = doc.sections[0].rows.iter().map(|r| r.id.as_str()).collect();
        let copy: Vec<&str> = next.sections[1].rows.iter().map(|r| r.id.as_str()).collect();
        assert_ne!(source, copy);
    }

    #[test]
    fn duplicated_content_is_independent() {
        let (doc, mut ids, _) = build();
        let next = duplicate_section(&doc, "section_1", &mut ids);
        let copy_id = next.sections[1].rows[0].columns[0].elements[0].id.clone();
        let next = update_element(
            &next,
            &copy_id,
            &ElementUpdate::content(Content::new().with("text", "changed")),
        );
        assert_ne!(next.element("el_5").unwrap().content.text("text"), Some("changed"));
        assert_eq!(next.element(&copy_id).unwrap().content.text("text"), Some("changed"));
    }

    #[test]
    fn duplicate_row_and_column() {
        let (doc, mut ids, _) = build();
        let next = duplicate_row(&doc, "section_1", "row_2", &mut ids);
        assert_eq!(next.sections[0].rows.len(), 2);
        assert_eq!(next.sections[0].rows[1].layout, "1-1");
        next.check_unique_ids().unwrap();

        let next = duplicate_column(&doc, "section_1", "row_2", "col_3", &mut ids);
        let columns = &next.sections[0].rows[0].columns;
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].id, "col_3");
        assert_eq!(columns[2].id, "col_4");
        assert_eq!(columns[1].elements.len(), 1);
        next.check_unique_ids().unwrap();
    }

    #[test]
    fn add_and_delete_column() {
        let (doc, mut ids, _) = build();
        let next = add_column(&doc, "section_1", "row_2", &mut ids);
        assert_eq!(next.sections[0].rows[0].columns.len(), 3);
        assert_eq!(next.sections[0].rows[0].columns[2].width, 1.0);
        let next = delete_column(&next, "section_1", "row_2", "col_3");
        assert!(next.element("el_5").is_none());
    }

    #[test]
    fn duplicate_element_inserts_after() {
        let (doc, mut ids, _) = build();
        let next = duplicate_element(&doc, "el_5", &mut ids);
        let elements = &next.sections[0].rows[0].columns[0].elements;
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id, "el_5");
        assert_eq!(elements[1].id, "el_6");
        assert_eq!(elements[1].content, elements[0].content);
    }

    #[test]
    fn container_style_replacement() {
        let (doc, ..) = build();
        let style = StyleBag::new()
            .with("padding", "40px 0")
            .with_override(Device::Mobile, "padding", "16px 0");
        let next = update_section_style(&doc, "section_1", style.clone());
        assert_eq!(next.sections[0].style, style);
        let next = update_row_style(&next, "section_1", "row_2", style.clone());
        assert_eq!(next.sections[0].rows[0].style, style);
        let next = update_column_style(&next, "section_1", "row_2", "col_4", style.clone());
        assert_eq!(next.sections[0].rows[0].columns[1].style, style);
    }

    #[test]
    fn section_width_change() {
        let (doc, ..) = build();
        let next = set_section_width(&doc, "section_1", SectionWidth::Medium, Some("900px".into()));
        assert_eq!(next.sections[0].width, SectionWidth::Medium);
        assert_eq!(next.sections[0].custom_width.as_deref(), Some("900px"));
    }
}
