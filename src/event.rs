//! Trigger symbols and device attribute values.
//!
//! A rocker switch never reports "on" or "off". The EEP layer decodes each
//! telegram into an [`AttributeValue`], the thing handler turns that into a
//! symbolic [`TriggerEvent`] on one of its channels, and profiles decide what,
//! if anything, the symbol means for a linked item.
//!
//! ## Symbol conventions
//! - Rocker triggers are `UP_PRESSED`, `UP_RELEASED`, `DOWN_PRESSED`, `DOWN_RELEASED`.
//! - Any other string is still a valid [`TriggerEvent`]; consumers ignore what
//!   they do not recognize.

use std::fmt;
use std::time::Instant;

/// Opaque trigger symbol emitted on a thing channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriggerEvent(String);

impl TriggerEvent {
    pub const UP_PRESSED: &'static str = "UP_PRESSED";
    pub const UP_RELEASED: &'static str = "UP_RELEASED";
    pub const DOWN_PRESSED: &'static str = "DOWN_PRESSED";
    pub const DOWN_RELEASED: &'static str = "DOWN_RELEASED";

    pub fn new(symbol: impl Into<String>) -> Self {
        TriggerEvent(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for symbols ending in `_PRESSED`.
    pub fn is_press(&self) -> bool {
        self.0.ends_with("_PRESSED")
    }

    /// `true` for symbols ending in `_RELEASED`.
    pub fn is_release(&self) -> bool {
        self.0.ends_with("_RELEASED")
    }
}

impl From<&str> for TriggerEvent {
    fn from(s: &str) -> Self {
        TriggerEvent::new(s)
    }
}

impl PartialEq<str> for TriggerEvent {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trigger addressed to one channel of one thing.
///
/// This is the message carried from handlers to the trigger bus.
#[derive(Clone, Debug)]
pub struct ChannelTrigger {
    /// Capture time (monotonic).
    pub at: Instant,
    pub thing_uid: String,
    /// Channel id on the thing, e.g. `"rocker_a"`.
    pub channel: String,
    pub event: TriggerEvent,
}

impl ChannelTrigger {
    pub fn new(thing_uid: impl Into<String>, channel: impl Into<String>, event: TriggerEvent) -> Self {
        Self {
            at: Instant::now(),
            thing_uid: thing_uid.into(),
            channel: channel.into(),
            event,
        }
    }
}

/// One of the two rockers on an F6-02 switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rocker {
    A,
    B,
}

impl Rocker {
    /// Channel id the handler emits this rocker's triggers on.
    pub fn channel_id(self) -> &'static str {
        match self {
            Rocker::A => "rocker_a",
            Rocker::B => "rocker_b",
        }
    }

    /// Inverse of [`channel_id`](Self::channel_id).
    pub fn from_channel_id(id: &str) -> Option<Rocker> {
        [Rocker::A, Rocker::B]
            .into_iter()
            .find(|r| r.channel_id() == id)
    }
}

/// Which half of a rocker was actuated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RockerDirection {
    Up,
    Down,
}

/// Attribute update delivered by the EEP layer for a rocker switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    RockerAction {
        rocker: Rocker,
        direction: RockerDirection,
        pressed: bool,
    },
    /// Number of buttons held simultaneously.
    ButtonCount(u8),
}

impl AttributeValue {
    /// Attribute name reporting rocker actions.
    pub const ROCKER_ACTION: &'static str = "ROCKER_ACTION";
    /// Attribute name reporting the pressed-button count.
    pub const BUTTON_COUNT: &'static str = "BUTTON_COUNT";

    /// Attribute name this value is published under.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeValue::RockerAction { .. } => Self::ROCKER_ACTION,
            AttributeValue::ButtonCount(_) => Self::BUTTON_COUNT,
        }
    }

    /// Trigger symbol for a rocker action, `None` for other attributes.
    pub fn trigger(&self) -> Option<TriggerEvent> {
        match *self {
            AttributeValue::RockerAction {
                direction,
                pressed,
                ..
            } => {
                let symbol = match (direction, pressed) {
                    (RockerDirection::Up, true) => TriggerEvent::UP_PRESSED,
                    (RockerDirection::Up, false) => TriggerEvent::UP_RELEASED,
                    (RockerDirection::Down, true) => TriggerEvent::DOWN_PRESSED,
                    (RockerDirection::Down, false) => TriggerEvent::DOWN_RELEASED,
                };
                Some(TriggerEvent::new(symbol))
            }
            AttributeValue::ButtonCount(_) => None,
        }
    }
}
