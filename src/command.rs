//! Commands sent to linked items and the states items report back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// A command applied to a linked item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    On,
    Off,
    Increase,
    Decrease,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::On => "ON",
            Command::Off => "OFF",
            Command::Increase => "INCREASE",
            Command::Decrease => "DECREASE",
        };
        f.write_str(s)
    }
}

/// Kind of item a profile can be linked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Switch,
    Dimmer,
}

impl ItemType {
    /// Whether an item of this type understands `command`.
    ///
    /// Dimmers also take plain on/off.
    pub fn accepts(self, command: Command) -> bool {
        match self {
            ItemType::Switch => matches!(command, Command::On | Command::Off),
            ItemType::Dimmer => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Switch => "Switch",
            ItemType::Dimmer => "Dimmer",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Switch" => Ok(ItemType::Switch),
            "Dimmer" => Ok(ItemType::Dimmer),
            other => Err(BridgeError::UnknownItemType(other.to_string())),
        }
    }
}

/// State reported by an item when it changes on the host side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemState {
    On,
    Off,
    /// Dimmer level, `0..=100`.
    Percent(u8),
    Undefined,
}

impl ItemState {
    /// Builds a percent state, clamping to `100`.
    pub fn percent(value: u8) -> Self {
        ItemState::Percent(value.min(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_only_accepts_on_off() {
        assert!(ItemType::Switch.accepts(Command::On));
        assert!(ItemType::Switch.accepts(Command::Off));
        assert!(!ItemType::Switch.accepts(Command::Increase));
        assert!(ItemType::Dimmer.accepts(Command::Decrease));
        assert!(ItemType::Dimmer.accepts(Command::Off));
    }

    #[test]
    fn item_type_parses_host_names() {
        assert_eq!("Dimmer".parse::<ItemType>().unwrap(), ItemType::Dimmer);
        assert!(matches!(
            "Rollershutter".parse::<ItemType>(),
            Err(BridgeError::UnknownItemType(_))
        ));
    }

    #[test]
    fn command_wire_names() {
        assert_eq!(Command::Increase.to_string(), "INCREASE");
        assert_eq!(serde_json::to_string(&Command::Off).unwrap(), "\"OFF\"");
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(ItemState::percent(250), ItemState::Percent(100));
    }
}
