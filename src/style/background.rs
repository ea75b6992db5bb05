//! Background compositor: color, gradient and image inputs → layered
//! `background-*` properties.
//!
//! Whenever an image or gradient is involved the output is a set of parallel
//! comma-separated lists (`backgroundImage`, `backgroundSize`,
//! `backgroundPosition`, `backgroundRepeat`, `backgroundAttachment`), one entry
//! per layer. The first-listed layer paints on top, so the translucent overlay
//! (gradient or solid color) comes first and the image last. Opacity is baked
//! into the overlay's color stops rather than the `opacity` property, which
//! would also fade the node's children.

use serde::{Deserialize, Serialize};

use crate::style::color::{apply_opacity, parse_opacity, try_apply_opacity};
use crate::style::device::Device;
use crate::style::tokenizer::rewrite_colors;
use crate::style::value::{PropertyMap, StyleValue};

pub const IMAGE: &str = "backgroundImage";
pub const COLOR: &str = "backgroundColor";
pub const GRADIENT: &str = "backgroundGradient";
pub const OPACITY: &str = "backgroundOpacity";
pub const MODE: &str = "backgroundImageMode";

/// The style-bag keys consumed by the compositor.
pub const INPUT_KEYS: [&str; 5] = [IMAGE, COLOR, GRADIENT, OPACITY, MODE];

/// How a background image is sized and placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageMode {
    #[default]
    FullCenter,
    Parallax,
    FillWidth,
    NoRepeat,
    Repeat,
}

/// Size, position, repeat and attachment of one background layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerGeometry {
    pub size: &'static str,
    pub position: &'static str,
    pub repeat: &'static str,
    pub attachment: &'static str,
}

impl ImageMode {
    /// Parse a mode name. Accepts kebab-case and snake_case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "full-center" => Some(ImageMode::FullCenter),
            "parallax" => Some(ImageMode::Parallax),
            "fill-width" => Some(ImageMode::FillWidth),
            "no-repeat" => Some(ImageMode::NoRepeat),
            "repeat" => Some(ImageMode::Repeat),
            _ => None,
        }
    }

    /// Geometry of the image layer for this mode on `device`.
    ///
    /// Parallax uses a fixed attachment except on mobile, where fixed
    /// backgrounds render incorrectly and `scroll` is forced.
    pub fn geometry(&self, device: Device) -> LayerGeometry {
        match self {
            ImageMode::FullCenter => LayerGeometry {
                size: "cover",
                position: "center center",
                repeat: "no-repeat",
                attachment: "scroll",
            },
            ImageMode::Parallax => LayerGeometry {
                size: "cover",
                position: "center center",
                repeat: "no-repeat",
                attachment: if device == Device::Mobile { "scroll" } else { "fixed" },
            },
            ImageMode::FillWidth => LayerGeometry {
                size: "100% auto",
                position: "top center",
                repeat: "no-repeat",
                attachment: "scroll",
            },
            ImageMode::NoRepeat => LayerGeometry {
                size: "auto",
                position: "center center",
                repeat: "no-repeat",
                attachment: "scroll",
            },
            ImageMode::Repeat => LayerGeometry {
                size: "auto",
                position: "top left",
                repeat: "repeat",
                attachment: "scroll",
            },
        }
    }
}

/// The five compositor inputs, read from a property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundInput {
    pub image: Option<String>,
    pub color: Option<String>,
    pub gradient: Option<String>,
    pub opacity: Option<f64>,
    pub mode: Option<ImageMode>,
}

impl BackgroundInput {
    /// Read the inputs from a property map. Blank values count as absent.
    pub fn from_props(props: &PropertyMap) -> Self {
        let text = |key: &str| {
            props
                .get(key)
                .filter(|v| !v.is_blank() && v.is_scalar())
                .map(|v| v.to_string())
        };
        let opacity = props.get(OPACITY).and_then(|v| match v {
            StyleValue::Number(n) => n.as_f64().map(|n| n.clamp(0.0, 1.0)),
            StyleValue::Text(s) => parse_opacity(s),
            StyleValue::Null | StyleValue::Bool(_) | StyleValue::Other(_) => None,
        });
        Self {
            image: text(IMAGE),
            color: text(COLOR),
            gradient: text(GRADIENT),
            opacity,
            mode: text(MODE).and_then(|m| ImageMode::parse(&m)),
        }
    }

    /// Layer `other` on top: each field set in `other` replaces ours.
    pub fn overlay(self, other: BackgroundInput) -> Self {
        Self {
            image: other.image.or(self.image),
            color: other.color.or(self.color),
            gradient: other.gradient.or(self.gradient),
            opacity: other.opacity.or(self.opacity),
            mode: other.mode.or(self.mode),
        }
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Composite background properties from a base map and an optional device
/// override map whose non-blank fields take precedence.
pub fn composite(base: &PropertyMap, overrides: Option<&PropertyMap>, device: Device) -> PropertyMap {
    let mut input = BackgroundInput::from_props(base);
    if let Some(overrides) = overrides {
        input = input.overlay(BackgroundInput::from_props(overrides));
    }
    composite_input(&input, device)
}

/// Composite background properties from already-gathered inputs.
pub fn composite_input(input: &BackgroundInput, device: Device) -> PropertyMap {
    let opacity = input.opacity.unwrap_or(1.0);
    let visible = opacity > 0.0;
    let mut out = PropertyMap::new();

    if input.image.is_none() && input.gradient.is_none() {
        if let Some(color) = input.color.as_deref().filter(|_| visible) {
            out.insert(COLOR.into(), apply_opacity(color, opacity).into());
        }
        return out;
    }

    let image_geometry = input.mode.unwrap_or_default().geometry(device);
    let overlay_geometry = LayerGeometry {
        size: "100% 100%",
        position: "center center",
        repeat: "no-repeat",
        attachment: image_geometry.attachment,
    };
    let mut layers: Vec<(String, LayerGeometry)> = Vec::new();

    if visible {
        if let Some(gradient) = &input.gradient {
            layers.push((gradient_with_opacity(gradient, opacity), overlay_geometry));
            if let Some(color) = &input.color {
                out.insert(COLOR.into(), apply_opacity(color, opacity).into());
            }
        } else if let Some(color) = &input.color {
            let stop = apply_opacity(color, opacity);
            layers.push((format!("linear-gradient({stop}, {stop})"), overlay_geometry));
        }
    }
    if let Some(image) = &input.image {
        layers.push((css_url(image), image_geometry));
    }
    if layers.is_empty() {
        return out;
    }

    let images: Vec<&str> = layers.iter().map(|(image, _)| image.as_str()).collect();
    out.insert(IMAGE.into(), images.join(", ").into());
    out.insert("backgroundSize".into(), join_layers(&layers, |g| g.size).into());
    out.insert("backgroundPosition".into(), join_layers(&layers, |g| g.position).into());
    out.insert("backgroundRepeat".into(), join_layers(&layers, |g| g.repeat).into());
    out.insert("backgroundAttachment".into(), join_layers(&layers, |g| g.attachment).into());
    out
}

fn join_layers(
    layers: &[(String, LayerGeometry)],
    field: impl Fn(&LayerGeometry) -> &'static str,
) -> String {
    layers
        .iter()
        .map(|(_, geometry)| field(geometry))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrite every color token inside a gradient to carry `opacity`.
pub fn gradient_with_opacity(gradient: &str, opacity: f64) -> String {
    if opacity >= 1.0 {
        return gradient.to_owned();
    }
    rewrite_colors(gradient, |token| try_apply_opacity(token, opacity))
}

/// Wrap a bare URL in `url("…")`. Values that are already CSS images pass
/// through.
pub fn css_url(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("url(") || image.contains("gradient(") {
        image.to_owned()
    } else {
        format!("url(\"{}\")", image.replace('"', "%22"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn props(pairs: &[(&str, StyleValue)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn text<'a>(map: &'a PropertyMap, key: &str) -> &'a str {
        map.get(key).and_then(StyleValue::as_str).unwrap_or_default()
    }

    #[test]
    fn color_only_opaque() {
        let out = composite(&props(&[(COLOR, "#123456".into())]), None, Device::Desktop);
        assert_eq!(out, props(&[(COLOR, "#123456".into())]));
    }

    #[test]
    fn color_only_translucent() {
        let out = composite(
            &props(&[(COLOR, "#000000".into()), (OPACITY, 0.5.into())]),
            None,
            Device::Desktop,
        );
        assert_eq!(text(&out, COLOR), "rgba(0, 0, 0, 0.5)");
        assert!(!out.contains_key(IMAGE));
    }

    #[test]
    fn color_only_fully_transparent_emits_nothing() {
        let out = composite(
            &props(&[(COLOR, "red".into()), (OPACITY, 0.into())]),
            None,
            Device::Desktop,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn color_overlay_on_image() {
        let out = composite(
            &props(&[
                (COLOR, "#000000".into()),
                (OPACITY, 0.5.into()),
                (IMAGE, "x.png".into()),
            ]),
            None,
            Device::Desktop,
        );
        let image = text(&out, IMAGE);
        assert_eq!(
            image,
            "linear-gradient(rgba(0, 0, 0, 0.5), rgba(0, 0, 0, 0.5)), url(\"x.png\")"
        );
        assert_eq!(text(&out, "backgroundSize"), "100% 100%, cover");
        assert_eq!(text(&out, "backgroundRepeat"), "no-repeat, no-repeat");
        assert!(!out.contains_key(COLOR));
    }

    #[test]
    fn gradient_overlay_rewrites_stops() {
        let out = composite(
            &props(&[
                (GRADIENT, "linear-gradient(to right, #ff0000 0%, blue 100%)".into()),
                (OPACITY, "50%".into()),
                (IMAGE, "url(hero.jpg)".into()),
            ]),
            None,
            Device::Desktop,
        );
        assert_eq!(
            text(&out, IMAGE),
            "linear-gradient(to right, rgba(255, 0, 0, 0.5) 0%, rgba(0, 0, 255, 0.5) 100%), url(hero.jpg)"
        );
    }

    #[test]
    fn gradient_with_color_keeps_color_underneath() {
        let out = composite(
            &props(&[
                (GRADIENT, "linear-gradient(red, blue)".into()),
                (COLOR, "white".into()),
            ]),
            None,
            Device::Desktop,
        );
        assert_eq!(text(&out, IMAGE), "linear-gradient(red, blue)");
        assert_eq!(text(&out, COLOR), "white");
    }

    #[test]
    fn image_only_single_layer() {
        let out = composite(
            &props(&[(IMAGE, "a.png".into()), (MODE, "repeat".into())]),
            None,
            Device::Desktop,
        );
        assert_eq!(text(&out, IMAGE), "url(\"a.png\")");
        assert_eq!(text(&out, "backgroundSize"), "auto");
        assert_eq!(text(&out, "backgroundPosition"), "top left");
        assert_eq!(text(&out, "backgroundRepeat"), "repeat");
    }

    #[test]
    fn parallax_is_fixed_except_on_mobile() {
        let base = props(&[(IMAGE, "p.jpg".into()), (MODE, "parallax".into())]);
        let desktop = composite(&base, None, Device::Desktop);
        let tablet = composite(&base, None, Device::Tablet);
        let mobile = composite(&base, None, Device::Mobile);
        assert_eq!(text(&desktop, "backgroundAttachment"), "fixed");
        assert_eq!(text(&tablet, "backgroundAttachment"), "fixed");
        assert_eq!(text(&mobile, "backgroundAttachment"), "scroll");
    }

    #[test]
    fn overlay_follows_image_attachment() {
        let base = props(&[
            (IMAGE, "p.jpg".into()),
            (COLOR, "black".into()),
            (OPACITY, 0.3.into()),
            (MODE, "parallax".into()),
        ]);
        let out = composite(&base, None, Device::Desktop);
        assert_eq!(text(&out, "backgroundAttachment"), "fixed, fixed");
    }

    #[test]
    fn device_override_takes_precedence() {
        let base = props(&[(IMAGE, "desk.jpg".into()), (COLOR, "red".into())]);
        let mobile = props(&[(IMAGE, "phone.jpg".into()), (COLOR, "".into())]);
        let out = composite(&base, Some(&mobile), Device::Mobile);
        assert_eq!(
            text(&out, IMAGE),
            "linear-gradient(red, red), url(\"phone.jpg\")"
        );
    }

    #[test]
    fn unknown_mode_falls_back_to_full_center() {
        let out = composite(
            &props(&[(IMAGE, "a.png".into()), (MODE, "zoomed".into())]),
            None,
            Device::Desktop,
        );
        assert_eq!(text(&out, "backgroundSize"), "cover");
    }

    #[test]
    fn mode_parse_variants() {
        assert_eq!(ImageMode::parse("fill_width"), Some(ImageMode::FillWidth));
        assert_eq!(ImageMode::parse("No-Repeat"), Some(ImageMode::NoRepeat));
        assert_eq!(ImageMode::parse(""), None);
    }

    #[test]
    fn empty_input() {
        assert!(BackgroundInput::from_props(&PropertyMap::new()).is_empty());
        assert!(composite(&PropertyMap::new(), None, Device::Desktop).is_empty());
    }
}
