//! Property naming and value serialization for emitted CSS.
//!
//! Style bags use camelCase names (`paddingTop`, `backgroundColor`); CSS text
//! uses kebab-case. Numeric values gain a `px` unit unless the property is
//! unitless.

use crate::style::value::StyleValue;

/// Properties whose numeric values are emitted without a unit.
const UNITLESS: &[&str] = &[
    "flex",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "opacity",
    "order",
    "zIndex",
    "zoom",
];

/// Keys that drive the editor or the style pipeline and are never emitted as
/// CSS declarations.
pub const EDITOR_ONLY_KEYS: &[&str] = &[
    "backgroundGradient",
    "backgroundImageMode",
    "backgroundOpacity",
    "contentAlign",
    "contentDirection",
    "contentGap",
    "contentJustify",
    "customCss",
    "hoverBackgroundColor",
    "hoverColor",
    "imageFit",
    "shadow",
];

/// Returns `true` if `name` never appears in emitted CSS.
pub fn is_editor_only(name: &str) -> bool {
    EDITOR_ONLY_KEYS.contains(&name)
}

/// Convert a camelCase property name to its kebab-case CSS form.
///
/// Vendor-prefixed names (`WebkitTextStroke`, `msTransform`) gain a leading
/// dash; names that already contain a dash are returned unchanged.
pub fn kebab_case(name: &str) -> String {
    if name.contains('-') {
        return name.to_owned();
    }
    let mut out = String::with_capacity(name.len() + 4);
    if name
        .strip_prefix("ms")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
    {
        out.push('-');
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Serialize a value for use in CSS text, or `None` if it should be skipped.
pub fn css_value(name: &str, value: &StyleValue) -> Option<String> {
    match value {
        StyleValue::Null | StyleValue::Bool(_) | StyleValue::Other(_) => None,
        StyleValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        StyleValue::Number(n) => {
            let text = value.to_string();
            if n.as_f64() == Some(0.0) || UNITLESS.contains(&name) {
                Some(text)
            } else {
                Some(format!("{text}px"))
            }
        }
    }
}

/// Format a single `name: value` declaration with a kebab-cased name.
pub fn declaration(name: &str, value: &StyleValue) -> Option<(String, String)> {
    css_value(name, value).map(|v| (kebab_case(name), v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_simple() {
        assert_eq!(kebab_case("paddingTop"), "padding-top");
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("color"), "color");
    }

    #[test]
    fn kebab_vendor_prefix() {
        assert_eq!(kebab_case("WebkitTextStroke"), "-webkit-text-stroke");
        assert_eq!(kebab_case("msTransform"), "-ms-transform");
        assert_eq!(kebab_case("msOverflowStyle"), "-ms-overflow-style");
        assert_eq!(kebab_case("mask"), "mask");
    }

    #[test]
    fn kebab_already_kebab() {
        assert_eq!(kebab_case("font-size"), "font-size");
    }

    #[test]
    fn numbers_gain_px_unless_unitless() {
        assert_eq!(css_value("width", &StyleValue::from(120)), Some("120px".into()));
        assert_eq!(css_value("opacity", &StyleValue::from(0.4)), Some("0.4".into()));
        assert_eq!(css_value("fontWeight", &StyleValue::from(700)), Some("700".into()));
        assert_eq!(css_value("marginTop", &StyleValue::from(0)), Some("0".into()));
    }

    #[test]
    fn blank_and_bool_skipped() {
        assert_eq!(css_value("color", &StyleValue::from("")), None);
        assert_eq!(css_value("color", &StyleValue::Null), None);
        assert_eq!(css_value("hidden", &StyleValue::Bool(true)), None);
        assert_eq!(
            css_value("boxShadowConfig", &StyleValue::Other(serde_json::json!({"x": 1}))),
            None
        );
    }

    #[test]
    fn editor_only_keys() {
        assert!(is_editor_only("hoverColor"));
        assert!(is_editor_only("backgroundOpacity"));
        assert!(!is_editor_only("backgroundColor"));
    }
}
