//! Responsive merge: base bag + device override bucket → one property map.
//!
//! Resolution for a device:
//!
//! 1. Expand shorthands on the base bag.
//! 2. Pick the device's override bucket, falling back along
//!    [`Device::fallback`] while the bucket is empty.
//! 3. Drop blank entries (`null`, empty strings) from the bucket.
//! 4. Merge the bucket over the base, key by key.
//! 5. Expand shorthands again on the merged result.
//!
//! The bucket is expanded on its own before step 4 so that an override
//! shorthand (`padding: 4px`) supersedes base longhands rather than losing to
//! them. Every step is total: missing buckets and malformed shorthands simply
//! contribute nothing.

use crate::style::device::Device;
use crate::style::shorthand::expand_shorthands;
use crate::style::value::{PropertyMap, StyleBag};

/// Copy of `props` without blank values.
pub fn filter_blank(props: &PropertyMap) -> PropertyMap {
    props
        .iter()
        .filter(|(_, value)| !value.is_blank())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// The filtered override bucket that applies to `device`.
///
/// An empty bucket defers to the next wider device (`mobile` → `tablet` →
/// `desktop`). The result may be empty.
pub fn select_overrides(bag: &StyleBag, device: Device) -> PropertyMap {
    let mut current = Some(device);
    while let Some(candidate) = current {
        let bucket = filter_blank(bag.responsive.bucket(candidate));
        if !bucket.is_empty() {
            return bucket;
        }
        current = candidate.fallback();
    }
    PropertyMap::new()
}

/// Merge `overrides` over `base`: every override key wins.
pub fn merge_props(base: &PropertyMap, overrides: &PropertyMap) -> PropertyMap {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Resolve a style bag for `device` into a flat property map.
pub fn resolve_responsive(bag: &StyleBag, device: Device) -> PropertyMap {
    let base = expand_shorthands(&bag.props);
    let overrides = expand_shorthands(&select_overrides(bag, device));
    expand_shorthands(&merge_props(&base, &overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::value::{Responsive, StyleValue};
    use pretty_assertions::assert_eq;

    fn get<'a>(map: &'a PropertyMap, key: &str) -> Option<&'a str> {
        map.get(key).and_then(StyleValue::as_str)
    }

    #[test]
    fn desktop_uses_base_and_desktop_bucket() {
        let bag = StyleBag::new()
            .with("color", "black")
            .with("fontSize", "16px")
            .with_override(Device::Desktop, "color", "navy");
        let out = resolve_responsive(&bag, Device::Desktop);
        assert_eq!(get(&out, "color"), Some("navy"));
        assert_eq!(get(&out, "fontSize"), Some("16px"));
    }

    #[test]
    fn tablet_falls_back_to_desktop_bucket() {
        let bag = StyleBag::new().with_override(Device::Desktop, "color", "red");
        let out = resolve_responsive(&bag, Device::Tablet);
        assert_eq!(get(&out, "color"), Some("red"));
    }

    #[test]
    fn tablet_bucket_wins_when_present() {
        let bag = StyleBag::new()
            .with_override(Device::Desktop, "color", "red")
            .with_override(Device::Tablet, "fontSize", "14px");
        let out = resolve_responsive(&bag, Device::Tablet);
        assert_eq!(get(&out, "fontSize"), Some("14px"));
        assert_eq!(get(&out, "color"), None);
    }

    #[test]
    fn mobile_falls_back_through_tablet_to_desktop() {
        let bag = StyleBag::new()
            .with("color", "black")
            .with_override(Device::Desktop, "color", "red");
        assert_eq!(get(&resolve_responsive(&bag, Device::Mobile), "color"), Some("red"));

        let bag = bag.with_override(Device::Tablet, "color", "green");
        assert_eq!(get(&resolve_responsive(&bag, Device::Mobile), "color"), Some("green"));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let bag = StyleBag::new()
            .with("color", "black")
            .with_override(Device::Mobile, "color", "")
            .with_override(Device::Mobile, "fontSize", StyleValue::Null);
        let out = resolve_responsive(&bag, Device::Mobile);
        assert_eq!(get(&out, "color"), Some("black"));
        assert!(!out.contains_key("fontSize"));
    }

    #[test]
    fn bucket_of_only_blanks_counts_as_empty() {
        let bag = StyleBag::new()
            .with_override(Device::Desktop, "color", "red")
            .with_override(Device::Tablet, "color", "  ");
        let out = resolve_responsive(&bag, Device::Tablet);
        assert_eq!(get(&out, "color"), Some("red"));
    }

    #[test]
    fn override_shorthand_supersedes_base_longhands() {
        let bag = StyleBag::new()
            .with("padding", "20px")
            .with_override(Device::Mobile, "padding", "4px 8px");
        let out = resolve_responsive(&bag, Device::Mobile);
        assert_eq!(get(&out, "paddingTop"), Some("4px"));
        assert_eq!(get(&out, "paddingRight"), Some("8px"));
        assert!(!out.contains_key("padding"));
    }

    #[test]
    fn override_longhand_beats_base_shorthand() {
        let bag = StyleBag::new()
            .with("margin", "10px")
            .with_override(Device::Tablet, "marginTop", "0");
        let out = resolve_responsive(&bag, Device::Tablet);
        assert_eq!(get(&out, "marginTop"), Some("0"));
        assert_eq!(get(&out, "marginBottom"), Some("10px"));
    }

    #[test]
    fn missing_responsive_is_total() {
        let bag = StyleBag::new().with("padding", "1px 2px 3px 4px 5px");
        let out = resolve_responsive(&bag, Device::Mobile);
        assert_eq!(get(&out, "padding"), Some("1px 2px 3px 4px 5px"));
    }

    #[test]
    fn merge_is_idempotent() {
        let bag = StyleBag::new()
            .with("padding", "10px")
            .with("color", "black")
            .with_responsive(Responsive::default())
            .with_override(Device::Tablet, "padding", "2px")
            .with_override(Device::Tablet, "color", "gray");
        for device in Device::ALL {
            let once = resolve_responsive(&bag, device);
            let again = StyleBag::from_props(once.clone()).with_responsive(bag.responsive.clone());
            assert_eq!(resolve_responsive(&again, device), once, "device {device}");
        }
    }
}
