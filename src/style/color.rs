//! Color alpha normalization.
//!
//! Converts hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and named colors into an
//! equivalent alpha-bearing form so an opacity can be baked into the color
//! itself. Anything unrecognized is reported as `None` and callers pass it
//! through unchanged.

/// Named colors recognized by the normalizer, as RGB triples.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("aqua", (0, 255, 255)),
    ("beige", (245, 245, 220)),
    ("black", (0, 0, 0)),
    ("blue", (0, 0, 255)),
    ("brown", (165, 42, 42)),
    ("coral", (255, 127, 80)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkgrey", (169, 169, 169)),
    ("darkred", (139, 0, 0)),
    ("fuchsia", (255, 0, 255)),
    ("gold", (255, 215, 0)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("grey", (128, 128, 128)),
    ("indigo", (75, 0, 130)),
    ("ivory", (255, 255, 240)),
    ("lavender", (230, 230, 250)),
    ("lightblue", (173, 216, 230)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightgrey", (211, 211, 211)),
    ("lime", (0, 255, 0)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("navy", (0, 0, 128)),
    ("olive", (128, 128, 0)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("purple", (128, 0, 128)),
    ("red", (255, 0, 0)),
    ("salmon", (250, 128, 114)),
    ("silver", (192, 192, 192)),
    ("skyblue", (135, 206, 235)),
    ("teal", (0, 128, 128)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("white", (255, 255, 255)),
    ("yellow", (255, 255, 0)),
];

/// An RGB color with a 0-1 alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Multiply the alpha channel by `opacity`.
    pub fn fade(self, opacity: f64) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Serialize as `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, format_alpha(self.a))
    }
}

/// Format an alpha value with at most three decimals and no trailing zeros.
pub fn format_alpha(a: f64) -> String {
    let rounded = (a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

/// Parse an opacity given as a number (`0.5`) or percentage (`50%`).
pub fn parse_opacity(s: &str) -> Option<f64> {
    let s = s.trim();
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => s.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

/// Parse a hex, `rgb()`/`rgba()` or named color.
pub fn parse_rgba(color: &str) -> Option<Rgba> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = color.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_args(args);
    }
    if lower == "transparent" {
        return Some(Rgba { r: 0, g: 0, b: 0, a: 0.0 });
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|&(_, (r, g, b))| Rgba { r, g, b, a: 1.0 })
}

/// Rewrite `color` so its alpha is multiplied by `opacity`.
///
/// Returns `None` when the color is not in a recognized format.
pub fn try_apply_opacity(color: &str, opacity: f64) -> Option<String> {
    if let Some(rgba) = parse_rgba(color) {
        return Some(rgba.fade(opacity).to_css());
    }
    let lower = color.trim().to_ascii_lowercase();
    let args = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl"))?;
    let parts = split_args(args);
    let (h, s, l, a) = match parts.as_slice() {
        [h, s, l] => (*h, *s, *l, 1.0),
        [h, s, l, a] => (*h, *s, *l, parse_opacity(a)?),
        _ => return None,
    };
    Some(format!(
        "hsla({h}, {s}, {l}, {})",
        format_alpha(a * opacity.clamp(0.0, 1.0))
    ))
}

/// Apply `opacity` to `color`. Fully opaque requests and unrecognized colors
/// are returned unchanged.
pub fn apply_opacity(color: &str, opacity: f64) -> String {
    if opacity >= 1.0 {
        return color.to_owned();
    }
    try_apply_opacity(color, opacity).unwrap_or_else(|| color.to_owned())
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, a: 1.0 }),
        4 => Some(Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: f64::from(nibble(3)?) / 255.0,
        }),
        6 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 1.0 }),
        8 => Some(Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: f64::from(byte(6)?) / 255.0,
        }),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts = split_args(args);
    let (r, g, b, a) = match parts.as_slice() {
        [r, g, b] => (*r, *g, *b, 1.0),
        [r, g, b, a] => (*r, *g, *b, parse_opacity(a)?),
        _ => return None,
    };
    Some(Rgba {
        r: parse_channel(r)?,
        g: parse_channel(g)?,
        b: parse_channel(b)?,
        a,
    })
}

fn parse_channel(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 2.55,
        None => s.parse::<f64>().ok()?,
    };
    value
        .is_finite()
        .then(|| value.round().clamp(0.0, 255.0) as u8)
}

/// The text between `name(` and the closing `)`, if `s` is exactly that call.
fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Split both legacy (`1, 2, 3`) and modern (`1 2 3 / 50%`) argument lists.
fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}
