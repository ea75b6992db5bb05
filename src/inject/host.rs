//! Style hosts: where injected `<style>` elements live.
//!
//! [`StyleHost`] is the seam between the injection manager and a real
//! document head. [`HeadDocument`] is the in-memory host used by server-side
//! rendering and tests; it keeps elements in a slotmap arena plus an
//! insertion-order list so rendering is deterministic.

use slotmap::{new_key_type, SlotMap};

use crate::registry::definition::escape_html;

new_key_type! {
    /// Handle to one injected style element.
    pub struct StyleKey;
}

/// A `<style data-element-id=… data-anchor=…>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub element_id: String,
    pub anchor: String,
    pub css: String,
}

impl StyleElement {
    pub fn new(
        element_id: impl Into<String>,
        anchor: impl Into<String>,
        css: impl Into<String>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            anchor: anchor.into(),
            css: css.into(),
        }
    }

    /// Render as HTML. A literal `</style` inside the CSS is escaped so it
    /// cannot close the element early.
    pub fn to_html(&self) -> String {
        format!(
            "<style data-element-id=\"{}\" data-anchor=\"{}\">\n{}\n</style>",
            escape_html(&self.element_id),
            escape_html(&self.anchor),
            escape_style_body(&self.css)
        )
    }
}

fn escape_style_body(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(pos) = rest.to_ascii_lowercase().find("</style") {
        out.push_str(&rest[..pos]);
        out.push_str("<\\/");
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// A document head that can hold style elements.
pub trait StyleHost {
    fn insert_style(&mut self, style: StyleElement) -> StyleKey;

    fn remove_style(&mut self, key: StyleKey) -> Option<StyleElement>;

    fn get(&self, key: StyleKey) -> Option<&StyleElement>;

    /// Every style element carrying `data-element-id = element_id`.
    fn find_by_element_id(&self, element_id: &str) -> Vec<StyleKey>;
}

/// In-memory document head.
#[derive(Debug, Default)]
pub struct HeadDocument {
    styles: SlotMap<StyleKey, StyleElement>,
    order: Vec<StyleKey>,
}

impl HeadDocument {
    pub fn new() -> Self {
        Self {
            styles: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every style element in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = &StyleElement> {
        self.order.iter().filter_map(|key| self.styles.get(*key))
    }

    pub fn styles_for<'a>(&'a self, element_id: &'a str) -> impl Iterator<Item = &'a StyleElement> {
        self.styles().filter(move |s| s.element_id == element_id)
    }

    pub fn count_for(&self, element_id: &str) -> usize {
        self.styles_for(element_id).count()
    }

    pub fn clear(&mut self) {
        self.styles.clear();
        self.order.clear();
    }

    /// Render the head as HTML, one style element per line group.
    pub fn to_html(&self) -> String {
        let body: Vec<String> = self.styles().map(StyleElement::to_html).collect();
        if body.is_empty() {
            return "<head></head>".into();
        }
        format!("<head>\n{}\n</head>", body.join("\n"))
    }
}

impl StyleHost for HeadDocument {
    fn insert_style(&mut self, style: StyleElement) -> StyleKey {
        let key = self.styles.insert(style);
        self.order.push(key);
        key
    }

    fn remove_style(&mut self, key: StyleKey) -> Option<StyleElement> {
        let removed = self.styles.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(removed)
    }

    fn get(&self, key: StyleKey) -> Option<&StyleElement> {
        self.styles.get(key)
    }

    fn find_by_element_id(&self, element_id: &str) -> Vec<StyleKey> {
        self.order
            .iter()
            .copied()
            .filter(|key| {
                self.styles
                    .get(*key)
                    .is_some_and(|s| s.element_id == element_id)
            })
            .collect()
    }
}
