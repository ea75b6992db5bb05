//! Row layout keys: fixed table of relative column widths.

/// Layout key → relative column weights.
const LAYOUTS: &[(&str, &[f64])] = &[
    ("1", &[1.0]),
    ("1-1", &[1.0, 1.0]),
    ("1-1-1", &[1.0, 1.0, 1.0]),
    ("1-1-1-1", &[1.0, 1.0, 1.0, 1.0]),
    ("1-1-1-1-1", &[1.0, 1.0, 1.0, 1.0, 1.0]),
    ("1-1-1-1-1-1", &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
    ("1-2", &[1.0, 2.0]),
    ("2-1", &[2.0, 1.0]),
    ("1-3", &[1.0, 3.0]),
    ("3-1", &[3.0, 1.0]),
    ("1-1-2", &[1.0, 1.0, 2.0]),
    ("2-1-1", &[2.0, 1.0, 1.0]),
    ("1-2-1", &[1.0, 2.0, 1.0]),
];

/// Column weights for a layout key, or `None` if the key is unknown.
pub fn column_weights(key: &str) -> Option<&'static [f64]> {
    LAYOUTS
        .iter()
        .find(|(k, _)| *k == key.trim())
        .map(|(_, weights)| *weights)
}

/// All known layout keys, in table order.
pub fn layout_keys() -> impl Iterator<Item = &'static str> {
    LAYOUTS.iter().map(|(k, _)| *k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys() {
        assert_eq!(column_weights("1"), Some(&[1.0][..]));
        assert_eq!(column_weights("1-1"), Some(&[1.0, 1.0][..]));
        assert_eq!(column_weights("2-1"), Some(&[2.0, 1.0][..]));
    }

    #[test]
    fn unknown_key() {
        assert_eq!(column_weights("7-5"), None);
        assert_eq!(column_weights(""), None);
    }

    #[test]
    fn arity_matches_key() {
        for key in layout_keys() {
            let weights = column_weights(key).unwrap();
            assert_eq!(weights.len(), key.split('-').count(), "layout {key}");
        }
    }
}
