//! TOML configuration for a bridge instance.
//!
//! ```toml
//! serial_port = "/dev/ttyUSB0"
//!
//! [[things]]
//! uid = "enocean:rocker_switch:hall"
//! thing_type = "enocean:rocker_switch"
//! enocean_address = "0029F1B4"
//!
//! [[things.links]]
//! channel = "rocker_a"
//! profile = "jenocean:rocker-to-ONOFF"
//! item = "Hall_Light"
//! item_type = "Switch"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::command::ItemType;
use crate::error::Result;
use crate::factory::{Thing, ThingTypeUid};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Serial device of the transceiver. Without one the link stays down.
    pub serial_port: Option<String>,
    #[serde(default)]
    pub things: Vec<ThingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThingConfig {
    pub uid: String,
    #[serde(default = "ThingTypeUid::rocker_switch")]
    pub thing_type: ThingTypeUid,
    pub enocean_address: Option<String>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// Links one thing channel to a host item through a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub channel: String,
    pub profile: String,
    pub item: String,
    pub item_type: ItemType,
}

impl BridgeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl ThingConfig {
    pub fn thing(&self) -> Thing {
        Thing {
            uid: self.uid.clone(),
            thing_type: self.thing_type.clone(),
            enocean_address: self.enocean_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    const SAMPLE: &str = r#"
serial_port = "/dev/ttyUSB0"

[[things]]
uid = "enocean:rocker_switch:hall"
enocean_address = "0029F1B4"

[[things.links]]
channel = "rocker_a"
profile = "jenocean:rocker-to-ONOFF"
item = "Hall_Light"
item_type = "Switch"

[[things.links]]
channel = "rocker_b"
profile = "jenocean:rocker-to-dimmer"
item = "Hall_Dimmer"
item_type = "Dimmer"

[[things]]
uid = "enocean:rocker_switch:spare"
thing_type = "enocean:rocker_switch"
"#;

    #[test]
    fn parses_things_and_links() {
        let cfg = BridgeConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.serial_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cfg.things.len(), 2);

        let hall = &cfg.things[0];
        assert_eq!(hall.thing_type, ThingTypeUid::rocker_switch());
        assert_eq!(hall.links.len(), 2);
        assert_eq!(hall.links[1].item_type, ItemType::Dimmer);

        let spare = cfg.things[1].thing();
        assert!(spare.enocean_address.is_none());
        assert!(cfg.things[1].links.is_empty());
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg = BridgeConfig::from_toml_str("").unwrap();
        assert!(cfg.serial_port.is_none());
        assert!(cfg.things.is_empty());
    }

    #[test]
    fn bad_item_type_is_a_config_error() {
        let bad = r#"
[[things]]
uid = "x"
[[things.links]]
channel = "rocker_a"
profile = "jenocean:rocker-to-ONOFF"
item = "Blind"
item_type = "Rollershutter"
"#;
        assert!(matches!(
            BridgeConfig::from_toml_str(bad),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            BridgeConfig::load("/nonexistent/enocean-bridge.toml"),
            Err(BridgeError::Io(_))
        ));
    }
}
