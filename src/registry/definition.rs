//! Element type definitions and the renderer capability.
//!
//! A type definition is plain data (id, display name, category, defaults)
//! plus an [`ElementRenderer`] trait object. The core never looks inside the
//! rendered markup; it only wraps it in the scoping `div` that the injected
//! CSS targets.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BuilderConfig;
use crate::registry::kind::ElementKind;
use crate::style::device::Device;
use crate::style::render::{ResolveStyle, ResolvedStyle};
use crate::style::value::StyleBag;
use crate::tree::content::Content;
use crate::tree::node::Element;
use crate::tree::ops::ElementUpdate;

/// Palette category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Layout,
    Media,
    Form,
    Commerce,
    Marketing,
    Advanced,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Basic,
        Category::Layout,
        Category::Media,
        Category::Form,
        Category::Commerce,
        Category::Marketing,
        Category::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Layout => "layout",
            Category::Media => "media",
            Category::Form => "form",
            Category::Commerce => "commerce",
            Category::Marketing => "marketing",
            Category::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer receives for one element.
pub struct RenderProps<'a> {
    pub style: &'a ResolvedStyle,
    pub content: &'a Content,
    pub device: Device,
    /// `true` inside the editor canvas.
    pub editing: bool,
    /// Report an edit made through the rendered component.
    pub on_update: &'a mut dyn FnMut(ElementUpdate),
}

/// Rendering capability of an element type.
pub trait ElementRenderer: Send + Sync {
    /// Produce the element's inner markup.
    fn render(&self, props: RenderProps<'_>) -> String;

    /// Compute the style handed to [`render`](Self::render). Override to add
    /// type-specific derived properties.
    fn resolve_style(&self, element: &Element, device: Device) -> ResolvedStyle {
        element.resolve_style(device)
    }
}

/// Device, mode and configuration for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: Device,
    pub editing: bool,
    pub config: &'a BuilderConfig,
}

/// A registered element type.
#[derive(Clone)]
pub struct ElementType {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub default_content: Content,
    pub default_styles: Option<StyleBag>,
    pub renderer: Arc<dyn ElementRenderer>,
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("default_content", &self.default_content)
            .field("default_styles", &self.default_styles)
            .finish_non_exhaustive()
    }
}

impl ElementType {
    /// Create a type with empty defaults. The display name starts as the id.
    pub fn new(
        id: impl Into<String>,
        category: Category,
        renderer: Arc<dyn ElementRenderer>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            default_content: Content::new(),
            default_styles: None,
            renderer,
        }
    }

    /// Set the display name (builder).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the default content (builder).
    pub fn with_default_content(mut self, content: Content) -> Self {
        self.default_content = content;
        self
    }

    /// Set the default style bag (builder).
    pub fn with_default_styles(mut self, styles: StyleBag) -> Self {
        self.default_styles = Some(styles);
        self
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::from_type(&self.id)
    }

    /// A fresh element of this type carrying copies of the defaults.
    pub fn instantiate(&self, id: impl Into<String>) -> Element {
        let mut element = Element::new(id, self.id.clone());
        element.content = self.default_content.clone();
        element.style = self.default_styles.clone().unwrap_or_default();
        element
    }

    /// Render `element` wrapped in its scoping `div`
    /// (`id` = anchor, `class` = element class).
    pub fn render(
        &self,
        element: &Element,
        ctx: RenderContext<'_>,
        on_update: &mut dyn FnMut(ElementUpdate),
    ) -> String {
        let style = self.renderer.resolve_style(element, ctx.device);
        let inner = self.renderer.render(RenderProps {
            style: &style,
            content: &element.content,
            device: ctx.device,
            editing: ctx.editing,
            on_update,
        });
        format!(
            "<div id=\"{}\" class=\"{}\" data-element-type=\"{}\">{}</div>",
            escape_html(element.anchor()),
            ctx.config.element_class(&element.id),
            escape_html(&element.element_type),
            inner
        )
    }
}

// ---------------------------------------------------------------------------
// Markup renderers
// ---------------------------------------------------------------------------

/// Renders a single HTML tag from content keys.
///
/// `text_key` supplies the escaped body; each `(attribute, content key)` pair
/// becomes an attribute when the key holds a string. The resolved style is
/// written to the `style` attribute.
#[derive(Debug, Clone)]
pub struct MarkupRenderer {
    tag: &'static str,
    text_key: Option<&'static str>,
    attrs: Vec<(&'static str, &'static str)>,
    void: bool,
}

impl MarkupRenderer {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            text_key: None,
            attrs: Vec::new(),
            void: false,
        }
    }

    /// Take the body text from `key` (builder).
    pub fn with_text(mut self, key: &'static str) -> Self {
        self.text_key = Some(key);
        self
    }

    /// Map a content key onto an attribute (builder).
    pub fn with_attr(mut self, attr: &'static str, key: &'static str) -> Self {
        self.attrs.push((attr, key));
        self
    }

    /// Render as a void tag with no closing tag (builder).
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }

    fn open_tag(&self, tag: &str, props: &RenderProps<'_>) -> String {
        let mut out = format!("<{tag}");
        for (attr, key) in &self.attrs {
            if let Some(value) = content_text(props.content, key) {
                out.push_str(&format!(" {attr}=\"{}\"", escape_html(&value)));
            }
        }
        let inline = props.style.to_inline_css();
        if !inline.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_html(&inline)));
        }
        out.push('>');
        out
    }
}

impl ElementRenderer for MarkupRenderer {
    fn render(&self, props: RenderProps<'_>) -> String {
        let mut out = self.open_tag(self.tag, &props);
        if self.void {
            return out;
        }
        if let Some(text) = self.text_key.and_then(|key| content_text(props.content, key)) {
            out.push_str(&escape_html(&text));
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// Headings pick their tag (`h1`-`h6`) from the `level` content key.
#[derive(Debug, Clone, Default)]
pub struct HeadingRenderer;

impl ElementRenderer for HeadingRenderer {
    fn render(&self, props: RenderProps<'_>) -> String {
        let level = props
            .content
            .get("level")
            .and_then(Value::as_u64)
            .filter(|l| (1..=6).contains(l))
            .unwrap_or(2);
        let tag = format!("h{level}");
        let mut out = MarkupRenderer::new("h2").open_tag(&tag, &props);
        if let Some(text) = props.content.text("text") {
            out.push_str(&escape_html(text));
        }
        out.push_str(&format!("</{tag}>"));
        out
    }
}

/// Emits the `html` content key verbatim.
#[derive(Debug, Clone, Default)]
pub struct RawHtmlRenderer;

impl ElementRenderer for RawHtmlRenderer {
    fn render(&self, props: RenderProps<'_>) -> String {
        props.content.text("html").unwrap_or_default().to_owned()
    }
}

/// Renders the `images` content array as a row of `<img>` tags.
#[derive(Debug, Clone, Default)]
pub struct GalleryRenderer;

impl ElementRenderer for GalleryRenderer {
    fn render(&self, props: RenderProps<'_>) -> String {
        let images = props
            .content
            .get("images")
            .and_then(Value::as_array)
            .map(|images| images.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        let fit = props.style.get("objectFit").map(|v| v.to_string());
        let mut out = String::from("<div class=\"gallery\">");
        for src in images {
            match &fit {
                Some(fit) => out.push_str(&format!(
                    "<img src=\"{}\" style=\"object-fit: {}\">",
                    escape_html(src),
                    escape_html(fit)
                )),
                None => out.push_str(&format!("<img src=\"{}\">", escape_html(src))),
            }
        }
        out.push_str("</div>");
        out
    }
}

fn content_text(content: &Content, key: &str) -> Option<String> {
    match content.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Escape text for use in HTML bodies and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
