//! Style values, property maps and style bags.
//!
//! A [`StyleBag`] is the JSON-shaped style object attached to every layout
//! node: a flat map of camelCase CSS-like properties plus a `responsive`
//! sub-bag holding per-device override deltas. Maps are ordered so that every
//! serialization and every emitted stylesheet is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::style::device::Device;

/// A single property value as it appears in a persisted style bag.
///
/// Numbers keep their JSON form, so `16` stays an integer on the way back
/// out. Objects and arrays (editor-side structured settings) are carried in
/// [`StyleValue::Other`] untouched and never reach emitted CSS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// An explicit `null`. Treated as "not set".
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Other(serde_json::Value),
}

impl StyleValue {
    /// `true` for `null` and for strings that are empty after trimming.
    ///
    /// Blank values never override anything and never reach emitted CSS.
    pub fn is_blank(&self) -> bool {
        match self {
            StyleValue::Null => true,
            StyleValue::Text(s) => s.trim().is_empty(),
            StyleValue::Bool(_) | StyleValue::Number(_) | StyleValue::Other(_) => false,
        }
    }

    /// Returns `true` for values that can be written as CSS text.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, StyleValue::Other(_))
    }

    /// The string payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view: numbers as-is, text parsed when it is a plain number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => n.as_f64(),
            StyleValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Null => Ok(()),
            StyleValue::Bool(b) => write!(f, "{b}"),
            StyleValue::Number(n) => match n.as_f64().filter(|_| n.is_f64()) {
                Some(float) => write!(f, "{float}"),
                None => write!(f, "{n}"),
            },
            StyleValue::Text(s) => f.write_str(s.trim()),
            StyleValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Whole numbers are stored as integers; non-finite values become `null`.
impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            return StyleValue::Number(Number::from(value as i64));
        }
        Number::from_f64(value).map_or(StyleValue::Null, StyleValue::Number)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(Number::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

/// Ordered property name → value map.
pub type PropertyMap = BTreeMap<String, StyleValue>;

/// Per-device override buckets. Each bucket uses the same property names as
/// the base bag and holds only the properties that differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Responsive {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub desktop: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tablet: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mobile: PropertyMap,
}

impl Responsive {
    /// The override bucket for a device.
    pub fn bucket(&self, device: Device) -> &PropertyMap {
        match device {
            Device::Desktop => &self.desktop,
            Device::Tablet => &self.tablet,
            Device::Mobile => &self.mobile,
        }
    }

    fn bucket_mut(&mut self, device: Device) -> &mut PropertyMap {
        match device {
            Device::Desktop => &mut self.desktop,
            Device::Tablet => &mut self.tablet,
            Device::Mobile => &mut self.mobile,
        }
    }

    /// Returns `true` if no bucket holds any property.
    pub fn is_empty(&self) -> bool {
        self.desktop.is_empty() && self.tablet.is_empty() && self.mobile.is_empty()
    }
}

/// The style object attached to a layout node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleBag {
    /// Base (desktop-equivalent) properties.
    #[serde(flatten)]
    pub props: PropertyMap,
    /// Per-device override deltas.
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub responsive: Responsive,
}

impl StyleBag {
    /// Create an empty style bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from base properties only.
    pub fn from_props(props: PropertyMap) -> Self {
        Self {
            props,
            responsive: Responsive::default(),
        }
    }

    /// Set a base property (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Set a property inside a device bucket (builder).
    pub fn with_override(
        mut self,
        device: Device,
        name: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Self {
        self.responsive
            .bucket_mut(device)
            .insert(name.into(), value.into());
        self
    }

    /// Replace the responsive sub-bag (builder).
    pub fn with_responsive(mut self, responsive: Responsive) -> Self {
        self.responsive = responsive;
        self
    }

    /// Look up a base property.
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.props.get(name)
    }

    /// Returns `true` if neither the base bag nor any bucket holds a property.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.responsive.is_empty()
    }
}
