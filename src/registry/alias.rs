//! Versioned alias table for element type names.
//!
//! Persisted documents can name types that were renamed since they were
//! saved (`paragraph` → `text`) or spelled with the other separator
//! (`image_gallery` vs `image-gallery`). The storefront registry tries every
//! candidate spelling before declaring a miss.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Legacy type name → current type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTable {
    /// An empty table at `version`.
    pub fn new(version: u32) -> Self {
        Self {
            version,
            entries: BTreeMap::new(),
        }
    }

    /// The renames shipped with the crate.
    pub fn builtin() -> Self {
        [
            ("paragraph", "text"),
            ("title", "heading"),
            ("img", "image"),
            ("cta", "button"),
            ("separator", "divider"),
            ("custom-html", "html"),
            ("timer", "countdown"),
            ("image-gallery", "gallery"),
        ]
        .into_iter()
        .fold(Self::new(1), |table, (from, to)| table.with(from, to))
    }

    /// Load a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add an entry (builder).
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.insert(from.into(), to.into());
        self
    }

    /// The current name for a legacy name, if one is recorded.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Every spelling worth trying for `name`, most specific first: the name
    /// itself, its separator swap, then the recorded renames of both.
    pub fn candidates(&self, name: &str) -> Vec<String> {
        let mut out = vec![name.to_owned()];
        let swapped = swap_separator(name);
        if swapped != name {
            out.push(swapped);
        }
        let renames: Vec<String> = out
            .iter()
            .filter_map(|n| self.resolve(n))
            .map(str::to_owned)
            .collect();
        for rename in renames {
            if !out.contains(&rename) {
                out.push(rename);
            }
        }
        out
    }
}

/// snake_case ↔ kebab-case.
fn swap_separator(name: &str) -> String {
    if name.contains('_') {
        name.replace('_', "-")
    } else {
        name.replace('-', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn candidates_for_plain_name() {
        let table = AliasTable::builtin();
        assert_eq!(table.candidates("text"), vec!["text"]);
    }

    #[test]
    fn candidates_swap_separator() {
        let table = AliasTable::new(1);
        assert_eq!(table.candidates("product_card"), vec!["product_card", "product-card"]);
        assert_eq!(table.candidates("product-card"), vec!["product-card", "product_card"]);
    }

    #[test]
    fn candidates_follow_renames() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.candidates("image_gallery"),
            vec!["image_gallery", "image-gallery", "gallery"]
        );
        assert_eq!(table.candidates("paragraph"), vec!["paragraph", "text"]);
    }

    #[test]
    fn from_json() {
        let table =
            AliasTable::from_json(r#"{ "version": 3, "entries": { "promo": "countdown" } }"#)
                .unwrap();
        assert_eq!(table.version, 3);
        assert_eq!(table.resolve("promo"), Some("countdown"));
        assert_eq!(table.resolve("paragraph"), None);
    }
}
