//! Built-in element types.

use std::sync::Arc;

use serde_json::json;

use crate::registry::definition::{
    Category, ElementType, GalleryRenderer, HeadingRenderer, MarkupRenderer, RawHtmlRenderer,
};
use crate::style::value::StyleBag;
use crate::tree::content::Content;

/// Every built-in type, in palette order.
pub fn builtin_types() -> Vec<ElementType> {
    vec![
        ElementType::new("heading", Category::Basic, Arc::new(HeadingRenderer))
            .with_name("Heading")
            .with_default_content(Content::new().with("text", "Heading").with("level", 2))
            .with_default_styles(StyleBag::new().with("fontSize", "32px").with("fontWeight", 700)),
        ElementType::new(
            "text",
            Category::Basic,
            Arc::new(MarkupRenderer::new("p").with_text("text")),
        )
        .with_name("Text")
        .with_default_content(Content::new().with("text", "Write something here.")),
        ElementType::new(
            "button",
            Category::Basic,
            Arc::new(
                MarkupRenderer::new("a")
                    .with_text("text")
                    .with_attr("href", "url"),
            ),
        )
        .with_name("Button")
        .with_default_content(Content::new().with("text", "Click me").with("url", "#"))
        .with_default_styles(
            StyleBag::new()
                .with("padding", "12px 24px")
                .with("backgroundColor", "#111827")
                .with("color", "#ffffff")
                .with("borderRadius", "6px"),
        ),
        ElementType::new(
            "image",
            Category::Media,
            Arc::new(
                MarkupRenderer::new("img")
                    .with_attr("src", "src")
                    .with_attr("alt", "alt")
                    .void(),
            ),
        )
        .with_name("Image")
        .with_default_content(Content::new().with("src", "").with("alt", ""))
        .with_default_styles(StyleBag::new().with("width", "100%").with("imageFit", "cover")),
        ElementType::new(
            "video",
            Category::Media,
            Arc::new(
                MarkupRenderer::new("video")
                    .with_attr("src", "src")
                    .with_attr("poster", "poster"),
            ),
        )
        .with_name("Video")
        .with_default_content(Content::new().with("src", ""))
        .with_default_styles(StyleBag::new().with("width", "100%")),
        ElementType::new("gallery", Category::Media, Arc::new(GalleryRenderer))
            .with_name("Gallery")
            .with_default_content(Content::new().with("images", json!([]))),
        ElementType::new("spacer", Category::Layout, Arc::new(MarkupRenderer::new("div")))
            .with_name("Spacer")
            .with_default_styles(StyleBag::new().with("height", 40)),
        ElementType::new("divider", Category::Layout, Arc::new(MarkupRenderer::new("hr").void()))
            .with_name("Divider")
            .with_default_styles(
                StyleBag::new()
                    .with("borderTop", "1px solid #e5e7eb")
                    .with("margin", "16px 0"),
            ),
        ElementType::new(
            "icon",
            Category::Basic,
            Arc::new(MarkupRenderer::new("span").with_attr("data-icon", "icon")),
        )
        .with_name("Icon")
        .with_default_content(Content::new().with("icon", "star")),
        ElementType::new("html", Category::Advanced, Arc::new(RawHtmlRenderer))
            .with_name("Custom HTML")
            .with_default_content(Content::new().with("html", "")),
        ElementType::new(
            "form",
            Category::Form,
            Arc::new(MarkupRenderer::new("form").with_attr("action", "action")),
        )
        .with_name("Form")
        .with_default_content(Content::new().with("action", "").with("fields", json!([]))),
        ElementType::new(
            "countdown",
            Category::Marketing,
            Arc::new(
                MarkupRenderer::new("div")
                    .with_attr("data-countdown", "targetDate")
                    .with_text("label"),
            ),
        )
        .with_name("Countdown")
        .with_default_content(Content::new().with("targetDate", "").with("label", "")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::kind::ElementKind;

    #[test]
    fn builtin_ids_are_known_kinds() {
        for ty in builtin_types() {
            assert!(
                !matches!(ty.kind(), ElementKind::Custom(_)),
                "{} should be a known kind",
                ty.id
            );
        }
    }

    #[test]
    fn builtin_ids_unique() {
        let types = builtin_types();
        let mut ids: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }
}
