//! Target devices for responsive resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A device class a node can be rendered for.
///
/// `Desktop` is the default: the base style bag of every node describes how
/// it looks on desktop, and the other devices are expressed as deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Device {
    /// All devices, widest first.
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Tablet, Device::Mobile];

    /// The bucket name used inside a `responsive` sub-bag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
            Device::Mobile => "mobile",
        }
    }

    /// The next wider device whose overrides apply when this device has none.
    ///
    /// `Mobile` falls back to `Tablet`, `Tablet` to `Desktop`; `Desktop` is
    /// the end of the chain.
    pub fn fallback(&self) -> Option<Device> {
        match self {
            Device::Desktop => None,
            Device::Tablet => Some(Device::Desktop),
            Device::Mobile => Some(Device::Tablet),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown device name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device: {0}")]
pub struct UnknownDevice(pub String);

impl FromStr for Device {
    type Err = UnknownDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "tablet" => Ok(Device::Tablet),
            "mobile" => Ok(Device::Mobile),
            other => Err(UnknownDevice(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_chain() {
        assert_eq!(Device::Mobile.fallback(), Some(Device::Tablet));
        assert_eq!(Device::Tablet.fallback(), Some(Device::Desktop));
        assert_eq!(Device::Desktop.fallback(), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Tablet".parse::<Device>(), Ok(Device::Tablet));
        assert_eq!(" mobile ".parse::<Device>(), Ok(Device::Mobile));
        assert!("watch".parse::<Device>().is_err());
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Device::Mobile).unwrap();
        assert_eq!(json, "\"mobile\"");
    }
}
