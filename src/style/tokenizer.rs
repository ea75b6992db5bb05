//! logos-based tokenizer for color rewriting inside CSS values.
//!
//! Used to bake an opacity into gradient strings: only color-looking tokens
//! are handed to the rewrite callback, everything else (function names,
//! `to`/`at` keywords, angles, percentages, punctuation and whitespace) is
//! copied through byte-for-byte.
//!
//! Token priority follows the usual logos rules:
//! 1. Longest match wins (`rgba(0, 0, 0, 0.5)` as [`ColorToken::ColorFunction`]
//!    beats `rgba` as [`ColorToken::Ident`])
//! 2. For equal length matches, earlier-defined variants win

use logos::Logos;

/// Token produced by the color lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum ColorToken {
    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Color function call with its arguments: `rgb(...)`, `hsla(...)`.
    #[regex(r"(rgb|rgba|hsl|hsla|RGB|RGBA|HSL|HSLA)\([^()]*\)")]
    ColorFunction,

    /// Number with a unit: `45deg`, `30%`, `1.5turn`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?([a-zA-Z]+|%)")]
    Dimension,

    /// Bare number.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: function names, keywords, named colors.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,

    #[token("/")]
    Slash,
}

impl ColorToken {
    /// Whether the token could be a color and is worth offering for rewrite.
    pub fn may_be_color(&self) -> bool {
        matches!(
            self,
            ColorToken::HexColor | ColorToken::ColorFunction | ColorToken::Ident
        )
    }
}

/// Tokenize a value into `(token, text)` pairs. Unlexable input is skipped.
pub fn tokenize(input: &str) -> Vec<(ColorToken, String)> {
    ColorToken::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

/// Rebuild `input`, replacing each color-looking token for which `rewrite`
/// returns `Some`. Gaps between tokens and unlexable bytes are preserved.
pub fn rewrite_colors(input: &str, mut rewrite: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len() + 32);
    let mut cursor = 0;

    for (result, span) in ColorToken::lexer(input).spanned() {
        out.push_str(&input[cursor..span.start]);
        let text = &input[span.clone()];
        match result {
            Ok(token) if token.may_be_color() => match rewrite(text) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(text),
            },
            _ => out.push_str(text),
        }
        cursor = span.end;
    }

    out.push_str(&input[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<ColorToken> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn linear_gradient_tokens() {
        assert_eq!(
            tokens("linear-gradient(45deg, #fff 0%, red 100%)"),
            vec![
                ColorToken::Ident,
                ColorToken::ParenOpen,
                ColorToken::Dimension,
                ColorToken::Comma,
                ColorToken::HexColor,
                ColorToken::Dimension,
                ColorToken::Comma,
                ColorToken::Ident,
                ColorToken::Dimension,
                ColorToken::ParenClose,
            ]
        );
    }

    #[test]
    fn color_function_is_one_token() {
        let result = tokenize("rgba(0, 0, 0, 0.5)");
        assert_eq!(result, vec![(ColorToken::ColorFunction, "rgba(0, 0, 0, 0.5)".into())]);
    }

    #[test]
    fn hex_priority_over_garbage() {
        assert_eq!(tokens("#abcdef"), vec![ColorToken::HexColor]);
    }

    #[test]
    fn rewrite_preserves_layout() {
        let input = "linear-gradient(to right,  red 10%,blue)";
        let out = rewrite_colors(input, |tok| match tok {
            "red" => Some("R".into()),
            "blue" => Some("B".into()),
            _ => None,
        });
        assert_eq!(out, "linear-gradient(to right,  R 10%,B)");
    }

    #[test]
    fn rewrite_without_changes_is_identity() {
        let input = "radial-gradient(circle at center, #000 0, transparent 70%) ; ~";
        assert_eq!(rewrite_colors(input, |_| None), input);
    }

    #[test]
    fn numbers_and_punctuation_never_offered() {
        let mut seen = Vec::new();
        rewrite_colors("linear-gradient(90deg, #111 25%, #222)", |tok| {
            seen.push(tok.to_owned());
            None
        });
        assert_eq!(seen, vec!["linear-gradient", "#111", "#222"]);
    }
}
