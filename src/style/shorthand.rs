//! Spacing shorthand expansion (`margin`, `padding`).
//!
//! Splits a shorthand into four directional longhands following the CSS
//! distribution rule:
//!
//! - 1 value: all sides
//! - 2 values: vertical, horizontal
//! - 3 values: top, horizontal, bottom
//! - 4 values: top, right, bottom, left

use crate::style::value::{PropertyMap, StyleValue};

/// Shorthand properties expanded into `<name>Top`/`Right`/`Bottom`/`Left`.
pub const SPACING_SHORTHANDS: [&str; 2] = ["margin", "padding"];

/// Four-sided values (top, right, bottom, left).
#[derive(Debug, Clone, PartialEq)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Clone> Sides<T> {
    /// The same value on all four sides.
    pub fn all(v: T) -> Self {
        Self {
            top: v.clone(),
            right: v.clone(),
            bottom: v.clone(),
            left: v,
        }
    }

    /// Symmetric vertical and horizontal values.
    pub fn symmetric(vertical: T, horizontal: T) -> Self {
        Self {
            top: vertical.clone(),
            right: horizontal.clone(),
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Explicit values for all four sides.
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Distribute 1-4 values per the CSS shorthand rule. `None` for any other
    /// count.
    pub fn from_values(values: &[T]) -> Option<Self> {
        match values {
            [all] => Some(Self::all(all.clone())),
            [vertical, horizontal] => Some(Self::symmetric(vertical.clone(), horizontal.clone())),
            [top, horizontal, bottom] => Some(Self::new(
                top.clone(),
                horizontal.clone(),
                bottom.clone(),
                horizontal.clone(),
            )),
            [top, right, bottom, left] => Some(Self::new(
                top.clone(),
                right.clone(),
                bottom.clone(),
                left.clone(),
            )),
            _ => None,
        }
    }

    /// `(suffix, value)` pairs in top, right, bottom, left order.
    pub fn into_named(self) -> [(&'static str, T); 4] {
        [
            ("Top", self.top),
            ("Right", self.right),
            ("Bottom", self.bottom),
            ("Left", self.left),
        ]
    }
}

/// Split on whitespace, keeping parenthesized groups (`calc(1px + 2px)`)
/// together. Returns `None` when parentheses are unbalanced.
pub fn split_tokens(input: &str) -> Option<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;

    for (i, ch) in input.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.checked_sub(1)?;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&input[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }

    if depth != 0 {
        return None;
    }
    if let Some(s) = start {
        tokens.push(&input[s..]);
    }
    Some(tokens)
}

/// Expand a shorthand string. `None` if it is malformed.
pub fn expand(value: &str) -> Option<Sides<String>> {
    let tokens = split_tokens(value)?;
    let owned: Vec<String> = tokens.into_iter().map(str::to_owned).collect();
    Sides::from_values(&owned)
}

/// Expand a shorthand style value. Numbers apply to all four sides.
pub fn expand_value(value: &StyleValue) -> Option<Sides<StyleValue>> {
    match value {
        StyleValue::Number(_) => Some(Sides::all(value.clone())),
        StyleValue::Text(s) => {
            let sides = expand(s)?;
            Some(Sides::new(
                StyleValue::Text(sides.top),
                StyleValue::Text(sides.right),
                StyleValue::Text(sides.bottom),
                StyleValue::Text(sides.left),
            ))
        }
        StyleValue::Null | StyleValue::Bool(_) | StyleValue::Other(_) => None,
    }
}

/// Expand every spacing shorthand in `props`.
///
/// Longhands already present (and not blank) win over the shorthand; the
/// shorthand only fills the gaps and is then removed. A malformed shorthand is
/// left in place untouched.
pub fn expand_shorthands(props: &PropertyMap) -> PropertyMap {
    let mut out = props.clone();
    for shorthand in SPACING_SHORTHANDS {
        let Some(sides) = out.get(shorthand).and_then(expand_value) else {
            continue;
        };
        for (suffix, value) in sides.into_named() {
            let longhand = format!("{shorthand}{suffix}");
            let keep = out.get(&longhand).is_some_and(|v| !v.is_blank());
            if !keep {
                out.insert(longhand, value);
            }
        }
        out.remove(shorthand);
    }
    out
}
