//! Deep clone with fresh ids.
//!
//! Each function copies a node and all of its descendants by value and assigns
//! a new id to every node in the copy, drawing from the supplied generator.
//! The copy shares nothing with the source.

use crate::id::IdGenerator;
use crate::tree::node::{Column, Element, NodeKind, Row, Section};

pub fn clone_section(section: &Section, ids: &mut impl IdGenerator) -> Section {
    Section {
        id: ids.next_id(NodeKind::Section),
        width: section.width,
        custom_width: section.custom_width.clone(),
        style: section.style.clone(),
        rows: section.rows.iter().map(|row| clone_row(row, ids)).collect(),
    }
}

pub fn clone_row(row: &Row, ids: &mut impl IdGenerator) -> Row {
    Row {
        id: ids.next_id(NodeKind::Row),
        layout: row.layout.clone(),
        style: row.style.clone(),
        columns: row
            .columns
            .iter()
            .map(|column| clone_column(column, ids))
            .collect(),
    }
}

pub fn clone_column(column: &Column, ids: &mut impl IdGenerator) -> Column {
    Column {
        id: ids.next_id(NodeKind::Column),
        width: column.width,
        style: column.style.clone(),
        elements: column
            .elements
            .iter()
            .map(|element| clone_element(element, ids))
            .collect(),
    }
}

/// Copy an element under a new id. The anchor is not copied: two elements
/// sharing an anchor would receive each other's scoped CSS.
pub fn clone_element(element: &Element, ids: &mut impl IdGenerator) -> Element {
    Element {
        id: ids.next_id(NodeKind::Element),
        element_type: element.element_type.clone(),
        content: element.content.clone(),
        style: element.style.clone(),
        anchor: None,
    }
}
