//! Trigger logging listener.
use crate::event::ChannelTrigger;
use crate::eventbus::TriggerListener;
use log::debug;

/// A simple listener that logs every trigger at `debug` level.
#[derive(Default)]
pub struct TriggerLogger;

impl TriggerLogger {
    pub fn new() -> Self {
        TriggerLogger
    }
}

impl TriggerListener for TriggerLogger {
    fn on_trigger(&mut self, trigger: &ChannelTrigger) {
        debug!(
            "[trigger] {} {} {}",
            trigger.thing_uid, trigger.channel, trigger.event
        );
    }
}
