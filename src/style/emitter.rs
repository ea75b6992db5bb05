//! Responsive CSS emitter.
//!
//! The inline style of a node is its desktop resolution. Everything an inline
//! style cannot express is emitted as CSS text scoped to the element class:
//!
//! - hover rules, unconditional for the desktop resolution;
//! - one `@media` block per narrower device, holding every property whose
//!   resolved value differs from the inline style, with `!important` so it
//!   beats the inline base style;
//! - the same rules again under the editor preview classes, so a forced
//!   device preview matches what the media queries would select.
//!
//! Device blocks come from [`ResolveStyle::resolve_style`], so the kind rules
//! (column flex and content alignment, shadow and image-fit presets,
//! auto-centering) apply to responsive overrides exactly as they do in the
//! editor. A property present inline but absent for a device is reset with
//! `unset`.
//!
//! Output is deterministic: properties are emitted in map order and blocks
//! in device order.

use crate::config::BuilderConfig;
use crate::style::device::Device;
use crate::style::merge::resolve_responsive;
use crate::style::properties::declaration;
use crate::style::render::{ResolveStyle, ResolvedStyle};
use crate::style::value::{PropertyMap, StyleBag, StyleValue};

const INDENT: &str = "  ";

/// Hover inputs and the CSS property each one drives.
const HOVER_KEYS: &[(&str, &str)] = &[
    ("hoverColor", "color"),
    ("hoverBackgroundColor", "background-color"),
];

#[derive(Debug, Clone)]
pub struct CssEmitter {
    config: BuilderConfig,
}

impl Default for CssEmitter {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

impl CssEmitter {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The `.element-{id}` selector.
    pub fn selector(&self, id: &str) -> String {
        format!(".{}", self.config.element_class(id))
    }

    /// Emit every responsive and hover rule for one node. Returns an empty
    /// string when there is nothing to emit.
    pub fn emit<N: ResolveStyle + ?Sized>(&self, node: &N) -> String {
        let selector = self.selector(node.node_id());
        let bag = node.style_bag();
        let mut blocks = Vec::new();

        let inline = node.resolve_style(Device::Desktop);
        let base_hover = hover_props(bag, Device::Desktop);
        if let Some(hover) = self.hover_rule(&selector, &base_hover, "") {
            blocks.push(hover);
        }

        for device in [Device::Tablet, Device::Mobile] {
            let declarations = changed_declarations(&inline, &node.resolve_style(device));
            let hover = Some(hover_props(bag, device))
                .filter(|hover| *hover != base_hover)
                .unwrap_or_default();
            if declarations.is_empty() && hover.is_empty() {
                continue;
            }

            if let Some(query) = self.config.breakpoints.media_query(device) {
                let rules = self.rules(&selector, &declarations, &hover, INDENT);
                if !rules.is_empty() {
                    blocks.push(format!("@media {query} {{\n{rules}}}\n"));
                }
            }
            if let Some(preview) = self.config.preview_class(device) {
                let scoped = format!(".{preview} {selector}");
                let rules = self.rules(&scoped, &declarations, &hover, "");
                if !rules.is_empty() {
                    blocks.push(rules);
                }
            }
        }
        blocks.concat()
    }

    /// The plain and hover rules of one device block, each line prefixed by
    /// `indent`.
    fn rules(
        &self,
        selector: &str,
        declarations: &[(String, String)],
        hover: &PropertyMap,
        indent: &str,
    ) -> String {
        let mut out = String::new();
        if !declarations.is_empty() {
            out.push_str(&format!("{indent}{selector} {{\n"));
            for (name, value) in declarations {
                out.push_str(&format!("{indent}{INDENT}{name}: {value} !important;\n"));
            }
            out.push_str(&format!("{indent}}}\n"));
        }
        if let Some(hover) = self.hover_rule(selector, hover, indent) {
            out.push_str(&hover);
        }
        out
    }

    fn hover_rule(&self, selector: &str, props: &PropertyMap, indent: &str) -> Option<String> {
        let mut lines = Vec::new();
        for (key, property) in HOVER_KEYS {
            if let Some((_, value)) = props.get(*key).and_then(|v| declaration(key, v)) {
                lines.push(format!("{indent}{INDENT}{property}: {value} !important;\n"));
            }
        }
        if lines.is_empty() {
            return None;
        }
        lines.push(format!(
            "{indent}{INDENT}transition: {};\n",
            self.config.hover_transition
        ));
        Some(format!("{indent}{selector}:hover {{\n{}{indent}}}\n", lines.concat()))
    }
}

/// The hover inputs in effect for `device`.
fn hover_props(bag: &StyleBag, device: Device) -> PropertyMap {
    let mut merged = resolve_responsive(bag, device);
    merged.retain(|name, value| {
        HOVER_KEYS.iter().any(|(key, _)| key == name) && !value.is_blank()
    });
    merged
}

/// Kebab-cased declarations for every property whose resolved value for a
/// device differs from the inline style. Inline properties the device does
/// not resolve are reset.
fn changed_declarations(inline: &ResolvedStyle, resolved: &ResolvedStyle) -> Vec<(String, String)> {
    let mut changed: PropertyMap = resolved
        .iter()
        .filter(|(name, value)| inline.get(name) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    for (name, _) in inline.iter() {
        if resolved.get(name).is_none() {
            changed.insert(name.clone(), StyleValue::from("unset"));
        }
    }
    changed
        .iter()
        .filter_map(|(name, value)| declaration(name, value))
        .collect()
}
