//! Links between a thing channel and an item, through a trigger profile.

use log::warn;
use std::sync::mpsc::Sender;

use crate::command::{Command, ItemState};
use crate::event::ChannelTrigger;
use crate::eventbus::TriggerListener;
use crate::profile::{ProfileCallback, TriggerProfile};

/// Command addressed to a named host item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCommand {
    pub item: String,
    pub command: Command,
}

/// Callback that publishes commands for one item on a shared channel.
#[derive(Clone, Debug)]
pub struct ItemCallback {
    item: String,
    sender: Sender<ItemCommand>,
}

impl ItemCallback {
    pub fn new(item: impl Into<String>, sender: Sender<ItemCommand>) -> Self {
        Self {
            item: item.into(),
            sender,
        }
    }
}

impl ProfileCallback for ItemCallback {
    fn send_command(&mut self, command: Command) {
        let msg = ItemCommand {
            item: self.item.clone(),
            command,
        };
        if self.sender.send(msg).is_err() {
            warn!("dropping {command} for {}: host receiver is gone", self.item);
        }
    }
}

pub type BoxedCallback = Box<dyn ProfileCallback + Send>;

/// Feeds the triggers it receives into a profile bound to one item.
///
/// A link does not look at the trigger's thing or channel; it is meant to be
/// registered on a [`TriggerBus`](crate::eventbus::TriggerBus) with a thing tag
/// and a channel filter.
pub struct ProfileLink {
    item: String,
    profile: TriggerProfile<BoxedCallback>,
}

impl ProfileLink {
    pub fn new(item: impl Into<String>, profile: TriggerProfile<BoxedCallback>) -> Self {
        Self {
            item: item.into(),
            profile,
        }
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    /// Forwards a host-side state change of the linked item to the profile.
    pub fn on_item_state(&mut self, state: &ItemState) {
        self.profile.on_state_update_from_item(state);
    }
}

impl TriggerListener for ProfileLink {
    fn on_trigger(&mut self, trigger: &ChannelTrigger) {
        self.profile.on_trigger_from_handler(&trigger.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TriggerEvent;
    use crate::eventbus::{EventFilter, TriggerBus};
    use crate::profile::{ROCKER_TO_DIMMER, ROCKER_TO_ON_OFF};
    use std::sync::mpsc;

    fn up(thing: &str, channel: &str) -> ChannelTrigger {
        ChannelTrigger::new(thing, channel, TriggerEvent::new(TriggerEvent::UP_PRESSED))
    }

    #[test]
    fn link_on_bus_only_reacts_to_its_channel() {
        let (tx, rx) = mpsc::channel();
        let cb: BoxedCallback = Box::new(ItemCallback::new("Hall_Light", tx));
        let mut bus = TriggerBus::new();
        bus.subscribe(
            ProfileLink::new("Hall_Light", ROCKER_TO_ON_OFF.create(cb)),
            EventFilter::Channel("rocker_a"),
            Some("hall".into()),
        );

        bus.emit(&up("hall", "rocker_b"));
        bus.emit(&up("kitchen", "rocker_a"));
        bus.emit(&up("hall", "rocker_a"));

        let got: Vec<ItemCommand> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![ItemCommand {
                item: "Hall_Light".into(),
                command: Command::On
            }]
        );
    }

    #[test]
    fn state_updates_produce_no_commands() {
        let (tx, rx) = mpsc::channel();
        let cb: BoxedCallback = Box::new(ItemCallback::new("Desk", tx));
        let mut link = ProfileLink::new("Desk", ROCKER_TO_DIMMER.create(cb));
        assert_eq!(link.item(), "Desk");
        link.on_item_state(&ItemState::Percent(70));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_not_fatal() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut cb = ItemCallback::new("Gone", tx);
        cb.send_command(Command::Off);
        cb.send_command(Command::On);
    }
}
