//! Closed set of element kinds the core knows by name.
//!
//! The style renderer dispatches on this instead of comparing type strings.
//! Types contributed by loadable modules land in [`ElementKind::Custom`].

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Heading,
    Text,
    Button,
    Image,
    Video,
    Gallery,
    Spacer,
    Divider,
    Icon,
    Html,
    Form,
    Countdown,
    Custom(String),
}

impl ElementKind {
    /// Classify a registry type key.
    pub fn from_type(element_type: &str) -> Self {
        match element_type {
            "heading" => ElementKind::Heading,
            "text" => ElementKind::Text,
            "button" => ElementKind::Button,
            "image" => ElementKind::Image,
            "video" => ElementKind::Video,
            "gallery" => ElementKind::Gallery,
            "spacer" => ElementKind::Spacer,
            "divider" => ElementKind::Divider,
            "icon" => ElementKind::Icon,
            "html" => ElementKind::Html,
            "form" => ElementKind::Form,
            "countdown" => ElementKind::Countdown,
            other => ElementKind::Custom(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Heading => "heading",
            ElementKind::Text => "text",
            ElementKind::Button => "button",
            ElementKind::Image => "image",
            ElementKind::Video => "video",
            ElementKind::Gallery => "gallery",
            ElementKind::Spacer => "spacer",
            ElementKind::Divider => "divider",
            ElementKind::Icon => "icon",
            ElementKind::Html => "html",
            ElementKind::Form => "form",
            ElementKind::Countdown => "countdown",
            ElementKind::Custom(name) => name,
        }
    }

    /// Kinds whose `imageFit` becomes `objectFit`.
    pub fn is_media(&self) -> bool {
        matches!(self, ElementKind::Image | ElementKind::Video | ElementKind::Gallery)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_custom() {
        assert_eq!(ElementKind::from_type("video"), ElementKind::Video);
        assert_eq!(
            ElementKind::from_type("product-card"),
            ElementKind::Custom("product-card".into())
        );
        assert_eq!(ElementKind::from_type("product-card").as_str(), "product-card");
    }

    #[test]
    fn media_kinds() {
        assert!(ElementKind::Image.is_media());
        assert!(ElementKind::Gallery.is_media());
        assert!(!ElementKind::Heading.is_media());
        assert!(!ElementKind::Custom("image-slider".into()).is_media());
    }
}
