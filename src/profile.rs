//! Trigger profiles: turning rocker triggers into item commands.
//!
//! A [`TriggerProfileType`] is a small rule table (`trigger symbol -> command`)
//! plus the metadata a host needs to offer it for a link (label, item types,
//! channel types). A [`TriggerProfile`] pairs one of those tables with the
//! [`ProfileCallback`] of the linked item.
//!
//! Translation is stateless: each trigger is looked up independently, at most
//! one command is sent per trigger, and unknown symbols are dropped silently.
//!
//! # Example
//! ```
//! use enocean_bridge::{Command, TriggerEvent, ROCKER_TO_ON_OFF};
//!
//! let mut sent: Vec<Command> = Vec::new();
//! let mut profile = ROCKER_TO_ON_OFF.create(&mut sent);
//! profile.on_trigger_from_handler(&TriggerEvent::new("UP_PRESSED"));
//! profile.on_trigger_from_handler(&TriggerEvent::new("PRESSED_UNKNOWN"));
//! drop(profile);
//! assert_eq!(sent, vec![Command::On]);
//! ```

use log::{trace, warn};
use serde::Serialize;
use std::fmt;
use std::sync::mpsc::Sender;

use crate::command::{Command, ItemState, ItemType};
use crate::error::Result;
use crate::event::TriggerEvent;

/// Binding id of the thing types.
pub const BINDING_ID: &str = "enocean";

/// Binding id the profile types and their channel type are registered under.
pub const PROFILE_BINDING_ID: &str = "jenocean";

/// Identifies a profile type, displayed as `binding:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProfileTypeUid {
    pub binding: &'static str,
    pub id: &'static str,
}

impl ProfileTypeUid {
    /// Compares against the textual `binding:id` form.
    pub fn matches(&self, uid: &str) -> bool {
        match uid.split_once(':') {
            Some((binding, id)) => binding == self.binding && id == self.id,
            None => false,
        }
    }
}

impl fmt::Display for ProfileTypeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.binding, self.id)
    }
}

/// Maps one trigger symbol to one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerRule {
    pub trigger: &'static str,
    pub command: Command,
}

/// Description and rule table of a trigger profile.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerProfileType {
    pub uid: ProfileTypeUid,
    pub label: &'static str,
    pub supported_item_types: &'static [ItemType],
    /// Channel type uids (`binding:id`) the profile can be linked to.
    pub supported_channel_types: &'static [&'static str],
    pub rules: &'static [TriggerRule],
}

/// Channel type shared by both rocker channels.
pub const ROCKER_CHANNEL_TYPE: &str = "jenocean:rocker_channel";

pub static ROCKER_TO_ON_OFF: TriggerProfileType = TriggerProfileType {
    uid: ProfileTypeUid {
        binding: PROFILE_BINDING_ID,
        id: "rocker-to-ONOFF",
    },
    label: "Rocker to ON and OFF Profile",
    supported_item_types: &[ItemType::Switch],
    supported_channel_types: &[ROCKER_CHANNEL_TYPE],
    rules: &[
        TriggerRule {
            trigger: TriggerEvent::UP_PRESSED,
            command: Command::On,
        },
        TriggerRule {
            trigger: TriggerEvent::DOWN_PRESSED,
            command: Command::Off,
        },
    ],
};

pub static ROCKER_TO_DIMMER: TriggerProfileType = TriggerProfileType {
    uid: ProfileTypeUid {
        binding: PROFILE_BINDING_ID,
        id: "rocker-to-dimmer",
    },
    label: "Rocker to Dimmer Profile",
    supported_item_types: &[ItemType::Dimmer],
    supported_channel_types: &[ROCKER_CHANNEL_TYPE],
    rules: &[
        TriggerRule {
            trigger: TriggerEvent::UP_PRESSED,
            command: Command::Increase,
        },
        TriggerRule {
            trigger: TriggerEvent::DOWN_PRESSED,
            command: Command::Decrease,
        },
    ],
};

/// All profile types this crate provides.
pub fn profile_types() -> [&'static TriggerProfileType; 2] {
    [&ROCKER_TO_ON_OFF, &ROCKER_TO_DIMMER]
}

/// Looks up a built-in profile type by its `binding:id` uid.
pub fn profile_type(uid: &str) -> Option<&'static TriggerProfileType> {
    profile_types().into_iter().find(|t| t.uid.matches(uid))
}

impl TriggerProfileType {
    /// Command for `event`, if any rule matches.
    pub fn command_for(&self, event: &TriggerEvent) -> Option<Command> {
        self.rules
            .iter()
            .find(|rule| *event == *rule.trigger)
            .map(|rule| rule.command)
    }

    /// The item type must be listed and understand every command the rules emit.
    pub fn supports_item_type(&self, item_type: ItemType) -> bool {
        self.supported_item_types.contains(&item_type)
            && self.rules.iter().all(|rule| item_type.accepts(rule.command))
    }

    pub fn supports_channel_type(&self, channel_type: &str) -> bool {
        self.supported_channel_types.contains(&channel_type)
    }

    /// Builds a profile that sends its commands to `callback`.
    pub fn create<C: ProfileCallback>(&'static self, callback: C) -> TriggerProfile<C> {
        TriggerProfile::new(self, callback)
    }

    /// JSON description, for hosts that list profile types to users.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sink for commands produced by a profile ("send to the linked item").
pub trait ProfileCallback {
    fn send_command(&mut self, command: Command);
}

impl ProfileCallback for Vec<Command> {
    fn send_command(&mut self, command: Command) {
        self.push(command);
    }
}

impl ProfileCallback for Sender<Command> {
    fn send_command(&mut self, command: Command) {
        if self.send(command).is_err() {
            warn!("dropping {command}: item receiver is gone");
        }
    }
}

impl<C: ProfileCallback + ?Sized> ProfileCallback for &mut C {
    fn send_command(&mut self, command: Command) {
        (**self).send_command(command);
    }
}

impl<C: ProfileCallback + ?Sized> ProfileCallback for Box<C> {
    fn send_command(&mut self, command: Command) {
        (**self).send_command(command);
    }
}

/// A profile type bound to the callback of one linked item.
pub struct TriggerProfile<C> {
    profile_type: &'static TriggerProfileType,
    callback: C,
}

impl<C: ProfileCallback> TriggerProfile<C> {
    pub fn new(profile_type: &'static TriggerProfileType, callback: C) -> Self {
        Self {
            profile_type,
            callback,
        }
    }

    pub fn profile_type_uid(&self) -> ProfileTypeUid {
        self.profile_type.uid
    }

    /// Handles a trigger coming from the thing handler.
    ///
    /// Sends at most one command; unrecognized symbols are ignored.
    pub fn on_trigger_from_handler(&mut self, event: &TriggerEvent) {
        match self.profile_type.command_for(event) {
            Some(command) => {
                trace!("{}: {event} -> {command}", self.profile_type.uid);
                self.callback.send_command(command);
            }
            None => trace!("{}: ignoring {event}", self.profile_type.uid),
        }
    }

    /// Called when the linked item changed state on the host side.
    ///
    /// Rocker switches are transmit-only, so nothing is forwarded yet.
    pub fn on_state_update_from_item(&mut self, _state: &ItemState) {}

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn into_callback(self) -> C {
        self.callback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<C: ProfileCallback>(profile: &mut TriggerProfile<C>, symbols: &[&str]) {
        for s in symbols {
            profile.on_trigger_from_handler(&TriggerEvent::new(*s));
        }
    }

    #[test]
    fn on_off_maps_up_and_down() {
        let mut profile = ROCKER_TO_ON_OFF.create(Vec::new());
        feed(&mut profile, &["UP_PRESSED"]);
        assert_eq!(profile.callback(), &vec![Command::On]);
        feed(&mut profile, &["DOWN_PRESSED"]);
        assert_eq!(profile.into_callback(), vec![Command::On, Command::Off]);
    }

    #[test]
    fn dimmer_maps_to_increase_decrease() {
        let mut profile = ROCKER_TO_DIMMER.create(Vec::new());
        feed(&mut profile, &["UP_PRESSED", "DOWN_PRESSED"]);
        assert_eq!(
            profile.into_callback(),
            vec![Command::Increase, Command::Decrease]
        );
    }

    #[test]
    fn unknown_symbols_send_nothing() {
        let mut profile = ROCKER_TO_ON_OFF.create(Vec::new());
        feed(
            &mut profile,
            &["UP_RELEASED", "DOWN_RELEASED", "", "up_pressed", "PRESSED_UNKNOWN"],
        );
        assert!(profile.callback().is_empty());
    }

    #[test]
    fn mixed_sequence_on_binary_profile() {
        let mut profile = ROCKER_TO_ON_OFF.create(Vec::new());
        feed(&mut profile, &["UP_PRESSED", "DOWN_PRESSED", "PRESSED_UNKNOWN"]);
        assert_eq!(profile.into_callback(), vec![Command::On, Command::Off]);
    }

    #[test]
    fn repeated_triggers_are_not_suppressed() {
        let mut profile = ROCKER_TO_DIMMER.create(Vec::new());
        feed(&mut profile, &["UP_PRESSED"; 3]);
        assert_eq!(profile.into_callback(), vec![Command::Increase; 3]);
    }

    #[test]
    fn state_updates_are_ignored() {
        let mut profile = ROCKER_TO_DIMMER.create(Vec::new());
        profile.on_state_update_from_item(&ItemState::Percent(40));
        profile.on_state_update_from_item(&ItemState::Off);
        assert!(profile.callback().is_empty());
    }

    #[test]
    fn channel_sender_is_a_callback() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut profile = ROCKER_TO_ON_OFF.create(tx);
        feed(&mut profile, &["DOWN_PRESSED"]);
        assert_eq!(rx.try_recv().unwrap(), Command::Off);
    }

    #[test]
    fn lookup_by_uid() {
        let t = profile_type("jenocean:rocker-to-dimmer").unwrap();
        assert_eq!(t.label, "Rocker to Dimmer Profile");
        assert_eq!(t.uid.to_string(), "jenocean:rocker-to-dimmer");
        assert!(t.supports_item_type(ItemType::Dimmer));
        assert!(!t.supports_item_type(ItemType::Switch));
        assert!(t.supports_channel_type(ROCKER_CHANNEL_TYPE));
        assert!(profile_type("jenocean:rocker-to-ONOFF").is_some());
        assert!(profile_type("enocean:rocker-to-ONOFF").is_none());
        assert!(profile_type("rocker-to-ONOFF").is_none());
        assert!(profile_type("other:rocker-to-ONOFF").is_none());
    }

    #[test]
    fn listed_item_type_must_accept_every_rule_command() {
        static MISLABELLED: TriggerProfileType = TriggerProfileType {
            uid: ProfileTypeUid {
                binding: PROFILE_BINDING_ID,
                id: "rocker-to-level",
            },
            label: "Mislabelled",
            supported_item_types: &[ItemType::Switch, ItemType::Dimmer],
            supported_channel_types: &[ROCKER_CHANNEL_TYPE],
            rules: &[TriggerRule {
                trigger: TriggerEvent::UP_PRESSED,
                command: Command::Increase,
            }],
        };
        assert!(!MISLABELLED.supports_item_type(ItemType::Switch));
        assert!(MISLABELLED.supports_item_type(ItemType::Dimmer));
        assert!(ROCKER_TO_ON_OFF.supports_item_type(ItemType::Switch));
    }

    #[test]
    fn description_serializes() {
        let json = ROCKER_TO_ON_OFF.to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["uid"]["binding"], "jenocean");
        assert_eq!(v["uid"]["id"], "rocker-to-ONOFF");
        assert_eq!(v["supported_channel_types"][0], "jenocean:rocker_channel");
        assert_eq!(v["supported_item_types"][0], "Switch");
        assert_eq!(v["rules"][1]["command"], "OFF");
    }
}
