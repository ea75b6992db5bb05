//! Style renderer: layout node + device → the inline style a host applies.
//!
//! Every node kind runs the same pipeline and then adds its own rules:
//!
//! 1. Responsive merge ([`resolve_responsive`]).
//! 2. Background compositing: the five background inputs are replaced by
//!    layered `background-*` properties.
//! 3. Kind rules (section width, auto-centering, column flex and content
//!    alignment, element effects).
//! 4. Editor-only keys are dropped.
//!
//! Resolution is pure. [`StyleMemo`] caches results per node and device and
//! hands out the same `Rc` for unchanged inputs so hosts can skip re-renders
//! by pointer comparison.

use std::collections::HashMap;
use std::rc::Rc;

use crate::registry::kind::ElementKind;
use crate::style::background::{self, INPUT_KEYS};
use crate::style::device::Device;
use crate::style::merge::{resolve_responsive, select_overrides};
use crate::style::properties::{declaration, is_editor_only};
use crate::style::value::{PropertyMap, StyleBag, StyleValue};
use crate::tree::node::{Column, Element, Row, Section};

/// Shadow presets offered by the editor.
const SHADOW_PRESETS: &[(&str, &str)] = &[
    ("none", "none"),
    ("sm", "0 1px 2px rgba(0, 0, 0, 0.05)"),
    ("md", "0 4px 6px rgba(0, 0, 0, 0.1)"),
    ("lg", "0 10px 15px rgba(0, 0, 0, 0.1)"),
    ("xl", "0 20px 25px rgba(0, 0, 0, 0.15)"),
];

/// A flat, fully resolved property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle(PropertyMap);

impl ResolvedStyle {
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.0.get(name)
    }

    /// Text form of a property, as it would appear in CSS.
    pub fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|v| v.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> PropertyMap {
        self.0
    }

    /// Serialize as an inline `style` attribute value.
    pub fn to_inline_css(&self) -> String {
        self.0
            .iter()
            .filter_map(|(name, value)| declaration(name, value))
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<PropertyMap> for ResolvedStyle {
    fn from(props: PropertyMap) -> Self {
        Self(props)
    }
}

/// A layout node that carries a style bag.
pub trait ResolveStyle {
    fn node_id(&self) -> &str;

    fn style_bag(&self) -> &StyleBag;

    /// Node fields other than the style bag that affect resolution. Part of
    /// the memo key.
    fn style_variant(&self) -> String {
        String::new()
    }

    fn resolve_style(&self, device: Device) -> ResolvedStyle;
}

/// Steps 1 and 2: merge and composite the background.
pub fn resolve_bag(bag: &StyleBag, device: Device) -> PropertyMap {
    let mut props = resolve_responsive(bag, device);
    let overrides = select_overrides(bag, device);
    let layers = background::composite(&bag.props, Some(&overrides), device);
    for key in INPUT_KEYS {
        props.remove(key);
    }
    props.extend(layers);
    props
}

/// Step 4.
fn finish(mut props: PropertyMap) -> ResolvedStyle {
    props.retain(|name, value| !is_editor_only(name) && !value.is_blank() && value.is_scalar());
    ResolvedStyle(props)
}

fn has(props: &PropertyMap, name: &str) -> bool {
    props.get(name).is_some_and(|v| !v.is_blank())
}

/// Center a box narrower than its parent, unless a horizontal margin is set.
fn auto_center(props: &mut PropertyMap) {
    if has(props, "marginLeft") || has(props, "marginRight") {
        return;
    }
    let narrowed = ["width", "maxWidth"].iter().any(|key| {
        props
            .get(*key)
            .filter(|v| !v.is_blank())
            .is_some_and(|v| v.to_string() != "100%")
    });
    if narrowed {
        props.insert("marginLeft".into(), "auto".into());
        props.insert("marginRight".into(), "auto".into());
    }
}

impl ResolveStyle for Section {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn style_bag(&self) -> &StyleBag {
        &self.style
    }

    fn style_variant(&self) -> String {
        format!("{:?}|{}", self.width, self.custom_width.as_deref().unwrap_or_default())
    }

    fn resolve_style(&self, device: Device) -> ResolvedStyle {
        let mut props = resolve_bag(&self.style, device);
        if !has(&props, "maxWidth") {
            props.insert("maxWidth".into(), self.width.max_width().into());
        }
        if let Some(width) = self.custom_width.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            props.insert("width".into(), width.into());
        }
        auto_center(&mut props);
        finish(props)
    }
}

impl ResolveStyle for Row {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn style_bag(&self) -> &StyleBag {
        &self.style
    }

    fn resolve_style(&self, device: Device) -> ResolvedStyle {
        let mut props = resolve_bag(&self.style, device);
        auto_center(&mut props);
        finish(props)
    }
}

/// Editor alignment word → flexbox alignment value.
fn flex_alignment(value: &str) -> String {
    match value.trim() {
        "left" | "start" | "top" | "flex-start" => "flex-start".into(),
        "center" | "middle" => "center".into(),
        "right" | "end" | "bottom" | "flex-end" => "flex-end".into(),
        other => other.into(),
    }
}

impl ResolveStyle for Column {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn style_bag(&self) -> &StyleBag {
        &self.style
    }

    fn style_variant(&self) -> String {
        self.width.to_string()
    }

    fn resolve_style(&self, device: Device) -> ResolvedStyle {
        let mut props = resolve_bag(&self.style, device);
        let flex = if device == Device::Mobile {
            "1 1 100%".to_owned()
        } else {
            format!("{} 1 0%", self.width)
        };
        props.insert("flex".into(), flex.into());

        let content_keys = ["contentAlign", "contentJustify", "contentDirection", "contentGap"];
        if content_keys.iter().any(|key| has(&props, key)) {
            let text = |key: &str| props.get(key).filter(|v| !v.is_blank()).map(|v| v.to_string());
            let direction = text("contentDirection").unwrap_or_else(|| "column".into());
            let (cross, main) = if direction.starts_with("row") {
                ("justifyContent", "alignItems")
            } else {
                ("alignItems", "justifyContent")
            };
            let align = text("contentAlign").map(|v| flex_alignment(&v));
            let justify = text("contentJustify").map(|v| flex_alignment(&v));
            let gap = props.get("contentGap").filter(|v| !v.is_blank()).cloned();

            props.insert("display".into(), "flex".into());
            props.insert("flexDirection".into(), direction.into());
            if let Some(align) = align {
                props.insert(cross.into(), align.into());
            }
            if let Some(justify) = justify {
                props.insert(main.into(), justify.into());
            }
            if let Some(gap) = gap {
                props.insert("gap".into(), gap);
            }
        }
        finish(props)
    }
}

impl ResolveStyle for Element {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn style_bag(&self) -> &StyleBag {
        &self.style
    }

    fn style_variant(&self) -> String {
        self.element_type.clone()
    }

    fn resolve_style(&self, device: Device) -> ResolvedStyle {
        let mut props = resolve_bag(&self.style, device);

        if let Some(value) = props.get("opacity") {
            let clamped = match value {
                StyleValue::Number(_) | StyleValue::Text(_) => {
                    value.as_f64().map(|n| n.clamp(0.0, 1.0))
                }
                StyleValue::Null | StyleValue::Bool(_) | StyleValue::Other(_) => None,
            };
            if let Some(opacity) = clamped {
                props.insert("opacity".into(), opacity.into());
            }
        }

        if !has(&props, "boxShadow") {
            if let Some(shadow) = props.get("shadow").filter(|v| !v.is_blank()) {
                let shadow = shadow.to_string();
                let css = SHADOW_PRESETS
                    .iter()
                    .find(|(name, _)| *name == shadow)
                    .map_or(shadow.clone(), |(_, css)| (*css).to_owned());
                props.insert("boxShadow".into(), css.into());
            }
        }

        if ElementKind::from_type(&self.element_type).is_media() && !has(&props, "objectFit") {
            if let Some(fit) = props.get("imageFit").filter(|v| !v.is_blank()).cloned() {
                props.insert("objectFit".into(), fit);
            }
        }
        finish(props)
    }
}

// ---------------------------------------------------------------------------
// StyleMemo
// ---------------------------------------------------------------------------

struct MemoEntry {
    bag: StyleBag,
    variant: String,
    resolved: Rc<ResolvedStyle>,
}

/// Per-node, per-device cache of resolved styles.
#[derive(Default)]
pub struct StyleMemo {
    entries: HashMap<(String, Device), MemoEntry>,
}

impl StyleMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved style for `node`, recomputed only when its style bag or
    /// variant changed since the last call.
    pub fn get_or_resolve<N: ResolveStyle>(&mut self, node: &N, device: Device) -> Rc<ResolvedStyle> {
        let key = (node.node_id().to_owned(), device);
        let variant = node.style_variant();
        if let Some(entry) = self.entries.get(&key) {
            if entry.bag == *node.style_bag() && entry.variant == variant {
                return Rc::clone(&entry.resolved);
            }
        }
        let resolved = Rc::new(node.resolve_style(device));
        self.entries.insert(
            key,
            MemoEntry {
                bag: node.style_bag().clone(),
                variant,
                resolved: Rc::clone(&resolved),
            },
        );
        resolved
    }

    /// Forget every cached device for one node.
    pub fn invalidate(&mut self, node_id: &str) {
        self.entries.retain(|(id, _), _| id != node_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
