//! Eager element registry used by the editor.
//!
//! Every type is registered up front; lookups are plain map reads. The
//! palette order is registration order.

use std::collections::HashMap;

use tracing::debug;

use crate::registry::builtin::builtin_types;
use crate::registry::definition::{Category, ElementType};
use crate::tree::node::Element;

/// Lookup of element types by registry key.
pub trait ElementTypes {
    fn element_type(&self, id: &str) -> Option<&ElementType>;
}

#[derive(Debug, Default)]
pub struct EditorRegistry {
    types: Vec<ElementType>,
    index: HashMap<String, usize>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for ty in builtin_types() {
            registry.register(ty);
        }
        registry
    }

    /// Register a type. Re-registering an id replaces the definition in place
    /// and keeps its palette position.
    pub fn register(&mut self, ty: ElementType) {
        match self.index.get(&ty.id) {
            Some(&slot) => {
                debug!(id = %ty.id, "replacing element type");
                self.types[slot] = ty;
            }
            None => {
                self.index.insert(ty.id.clone(), self.types.len());
                self.types.push(ty);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ElementType> {
        self.index.get(id).map(|&slot| &self.types[slot])
    }

    /// Every type in registration order.
    pub fn get_all(&self) -> &[ElementType] {
        &self.types
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&ElementType> {
        self.types.iter().filter(|t| t.category == category).collect()
    }

    /// A fresh element of type `type_id`, or `None` if it is not registered.
    pub fn create_element(&self, type_id: &str, id: impl Into<String>) -> Option<Element> {
        self.get(type_id).map(|ty| ty.instantiate(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ElementTypes for EditorRegistry {
    fn element_type(&self, id: &str) -> Option<&ElementType> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::definition::MarkupRenderer;
    use crate::tree::content::Content;

    fn ty(id: &str, category: Category) -> ElementType {
        ElementType::new(id, category, Arc::new(MarkupRenderer::new("div")))
    }

    #[test]
    fn registration_order() {
        let mut registry = EditorRegistry::new();
        registry.register(ty("b", Category::Basic));
        registry.register(ty("a", Category::Media));
        registry.register(ty("c", Category::Basic));
        let ids: Vec<&str> = registry.get_all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn reregister_replaces_in_place() {
        let mut registry = EditorRegistry::new();
        registry.register(ty("a", Category::Basic));
        registry.register(ty("b", Category::Basic));
        registry.register(ty("a", Category::Basic).with_name("Alpha"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_all()[0].name, "Alpha");
    }

    #[test]
    fn by_category() {
        let registry = EditorRegistry::with_builtins();
        let media: Vec<&str> = registry
            .get_by_category(Category::Media)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(media, vec!["image", "video", "gallery"]);
        assert!(registry.get_by_category(Category::Commerce).is_empty());
    }

    #[test]
    fn create_element() {
        let mut registry = EditorRegistry::new();
        registry.register(
            ty("text", Category::Basic).with_default_content(Content::new().with("text", "Hi")),
        );
        let element = registry.create_element("text", "el_1").unwrap();
        assert_eq!(element.content.text("text"), Some("Hi"));
        assert!(registry.create_element("nope", "el_2").is_none());
    }
}
