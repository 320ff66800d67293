//! Thing handler for two-rocker switches.

use log::{trace, warn};
use std::sync::mpsc::Sender;

use crate::device::AttributeListener;
use crate::event::{AttributeValue, ChannelTrigger};

/// Turns rocker attribute updates into channel triggers.
///
/// The handler is cheap to clone; the factory registers one clone per
/// attribute it subscribes to.
#[derive(Clone, Debug)]
pub struct RockerHandler {
    thing_uid: String,
    triggers: Sender<ChannelTrigger>,
}

impl RockerHandler {
    pub fn new(thing_uid: impl Into<String>, triggers: Sender<ChannelTrigger>) -> Self {
        Self {
            thing_uid: thing_uid.into(),
            triggers,
        }
    }

    pub fn thing_uid(&self) -> &str {
        &self.thing_uid
    }
}

impl AttributeListener for RockerHandler {
    fn on_attribute(&mut self, device_uid: u32, _channel: u8, value: &AttributeValue) {
        match value {
            AttributeValue::RockerAction { rocker, .. } => {
                let Some(event) = value.trigger() else {
                    return;
                };
                let trigger = ChannelTrigger::new(self.thing_uid.as_str(), rocker.channel_id(), event);
                if self.triggers.send(trigger).is_err() {
                    warn!("{}: trigger bus is gone, dropping rocker action", self.thing_uid);
                }
            }
            AttributeValue::ButtonCount(n) => {
                trace!("{} ({device_uid:08X}): {n} button(s) held", self.thing_uid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Rocker, RockerDirection};
    use std::sync::mpsc;

    #[test]
    fn rocker_actions_become_channel_triggers() {
        let (tx, rx) = mpsc::channel();
        let mut h = RockerHandler::new("enocean:rocker_switch:hall", tx);

        h.on_attribute(
            1,
            0,
            &AttributeValue::RockerAction {
                rocker: Rocker::B,
                direction: RockerDirection::Down,
                pressed: true,
            },
        );
        h.on_attribute(1, 0, &AttributeValue::ButtonCount(2));

        let got: Vec<ChannelTrigger> = rx.try_iter().collect();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].thing_uid, "enocean:rocker_switch:hall");
        assert_eq!(got[0].channel, "rocker_b");
        assert_eq!(got[0].event.as_str(), "DOWN_PRESSED");
    }

    #[test]
    fn closed_bus_is_tolerated() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut h = RockerHandler::new("t", tx);
        h.on_attribute(
            1,
            0,
            &AttributeValue::RockerAction {
                rocker: Rocker::A,
                direction: RockerDirection::Up,
                pressed: false,
            },
        );
    }
}
