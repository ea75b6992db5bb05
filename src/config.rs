//! Builder configuration: breakpoints, class names and timeouts shared by the
//! CSS emitter, the injection manager and the storefront registry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::style::device::Device;

/// Upper bound for the storefront lazy-load wait.
pub const MAX_LAZY_LOAD_TIMEOUT_MS: u64 = 2000;

/// Errors from loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid breakpoints: mobile max {mobile_max}px, tablet {tablet_min}-{tablet_max}px")]
    InvalidBreakpoints {
        mobile_max: u32,
        tablet_min: u32,
        tablet_max: u32,
    },
}

/// Viewport widths (px) that select the tablet and mobile buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Breakpoints {
    pub tablet_min: u32,
    pub tablet_max: u32,
    pub mobile_max: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet_min: 768,
            tablet_max: 1023,
            mobile_max: 767,
        }
    }
}

impl Breakpoints {
    /// The media query condition for a device. Desktop has none: its rules
    /// are unconditional.
    pub fn media_query(&self, device: Device) -> Option<String> {
        match device {
            Device::Desktop => None,
            Device::Tablet => Some(format!(
                "(min-width: {}px) and (max-width: {}px)",
                self.tablet_min, self.tablet_max
            )),
            Device::Mobile => Some(format!("(max-width: {}px)", self.mobile_max)),
        }
    }

    /// The device a viewport of `width` px falls into.
    pub fn device_for_width(&self, width: u32) -> Device {
        if width <= self.mobile_max {
            Device::Mobile
        } else if width <= self.tablet_max {
            Device::Tablet
        } else {
            Device::Desktop
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mobile_max < self.tablet_min && self.tablet_min <= self.tablet_max {
            Ok(())
        } else {
            Err(ConfigError::InvalidBreakpoints {
                mobile_max: self.mobile_max,
                tablet_min: self.tablet_min,
                tablet_max: self.tablet_max,
            })
        }
    }
}

/// Configuration for the style pipeline and registries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
    pub breakpoints: Breakpoints,
    /// Prefix of the per-element scoping class (`element-{id}`).
    pub element_class_prefix: String,
    /// Ancestor class that forces the tablet layout in the editor preview.
    pub preview_tablet_class: String,
    /// Ancestor class that forces the mobile layout in the editor preview.
    pub preview_mobile_class: String,
    /// `transition` value emitted with hover rules.
    pub hover_transition: String,
    /// Editor chrome selectors that custom CSS must never reach.
    pub editor_chrome: Vec<String>,
    /// How long the storefront registry waits for a lazy load, in ms.
    pub lazy_load_timeout_ms: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            element_class_prefix: "element-".into(),
            preview_tablet_class: "preview-tablet".into(),
            preview_mobile_class: "preview-mobile".into(),
            hover_transition: "all 0.2s ease".into(),
            editor_chrome: vec![
                ".element-toolbar".into(),
                ".floating-toolbar".into(),
                "[data-editor-ui]".into(),
            ],
            lazy_load_timeout_ms: MAX_LAZY_LOAD_TIMEOUT_MS,
        }
    }
}

impl BuilderConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BuilderConfig = serde_json::from_str(json)?;
        config.breakpoints.validate()?;
        Ok(config)
    }

    /// Set the breakpoints (builder).
    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Set the element class prefix (builder).
    pub fn with_element_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.element_class_prefix = prefix.into();
        self
    }

    /// Set both preview ancestor classes (builder).
    pub fn with_preview_classes(
        mut self,
        tablet: impl Into<String>,
        mobile: impl Into<String>,
    ) -> Self {
        self.preview_tablet_class = tablet.into();
        self.preview_mobile_class = mobile.into();
        self
    }

    /// Set the hover transition (builder).
    pub fn with_hover_transition(mut self, transition: impl Into<String>) -> Self {
        self.hover_transition = transition.into();
        self
    }

    /// Add an editor chrome selector (builder).
    pub fn with_editor_chrome(mut self, selector: impl Into<String>) -> Self {
        self.editor_chrome.push(selector.into());
        self
    }

    /// Set the lazy-load timeout in ms (builder).
    pub fn with_lazy_load_timeout_ms(mut self, ms: u64) -> Self {
        self.lazy_load_timeout_ms = ms;
        self
    }

    /// The effective lazy-load timeout, never above two seconds.
    pub fn lazy_load_timeout(&self) -> Duration {
        Duration::from_millis(self.lazy_load_timeout_ms.min(MAX_LAZY_LOAD_TIMEOUT_MS))
    }

    /// The preview ancestor class for a device. Desktop has none.
    pub fn preview_class(&self, device: Device) -> Option<&str> {
        match device {
            Device::Desktop => None,
            Device::Tablet => Some(self.preview_tablet_class.as_str()),
            Device::Mobile => Some(self.preview_mobile_class.as_str()),
        }
    }

    /// The scoping class of an element, without the leading dot.
    pub fn element_class(&self, id: &str) -> String {
        format!("{}{}", self.element_class_prefix, sanitize_class(id))
    }
}

/// Replace every character that is not valid in a bare CSS class name.
pub fn sanitize_class(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = BuilderConfig::new();
        assert_eq!(config.element_class("el_1"), "element-el_1");
        assert_eq!(config.lazy_load_timeout(), Duration::from_secs(2));
        assert_eq!(config.preview_class(Device::Tablet), Some("preview-tablet"));
        assert_eq!(config.preview_class(Device::Desktop), None);
    }

    #[test]
    fn media_queries() {
        let bp = Breakpoints::default();
        assert_eq!(bp.media_query(Device::Desktop), None);
        assert_eq!(
            bp.media_query(Device::Tablet).as_deref(),
            Some("(min-width: 768px) and (max-width: 1023px)")
        );
        assert_eq!(bp.media_query(Device::Mobile).as_deref(), Some("(max-width: 767px)"));
    }

    #[test]
    fn device_for_width() {
        let bp = Breakpoints::default();
        assert_eq!(bp.device_for_width(375), Device::Mobile);
        assert_eq!(bp.device_for_width(767), Device::Mobile);
        assert_eq!(bp.device_for_width(768), Device::Tablet);
        assert_eq!(bp.device_for_width(1024), Device::Desktop);
    }

    #[test]
    fn timeout_is_capped() {
        let config = BuilderConfig::new().with_lazy_load_timeout_ms(10_000);
        assert_eq!(config.lazy_load_timeout(), Duration::from_millis(2000));
        let config = BuilderConfig::new().with_lazy_load_timeout_ms(250);
        assert_eq!(config.lazy_load_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn from_json_partial() {
        let config = BuilderConfig::from_json(
            r#"{ "elementClassPrefix": "pb-", "breakpoints": { "mobileMax": 599, "tabletMin": 600 } }"#,
        )
        .unwrap();
        assert_eq!(config.element_class_prefix, "pb-");
        assert_eq!(config.breakpoints.mobile_max, 599);
        assert_eq!(config.breakpoints.tablet_max, 1023);
        assert_eq!(config.hover_transition, "all 0.2s ease");
    }

    #[test]
    fn from_json_rejects_overlapping_breakpoints() {
        let result = BuilderConfig::from_json(r#"{ "breakpoints": { "mobileMax": 900 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidBreakpoints { .. })));
    }

    #[test]
    fn from_json_rejects_malformed() {
        assert!(matches!(BuilderConfig::from_json("[1,"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_class("el_1"), "el_1");
        assert_eq!(sanitize_class("a b.c"), "a_b_c");
    }
}
