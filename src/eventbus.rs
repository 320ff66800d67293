use crate::event::ChannelTrigger;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

/// Trait for reacting to channel triggers from any thing.
pub trait TriggerListener: Send {
    fn on_trigger(&mut self, trigger: &ChannelTrigger);
}

/// Lets a listener stay reachable by its owner while the bus holds it.
impl<L: TriggerListener> TriggerListener for Arc<Mutex<L>> {
    fn on_trigger(&mut self, trigger: &ChannelTrigger) {
        self.lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_trigger(trigger);
    }
}

/// Determines which triggers a listener wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    PressedOnly,
    ReleasedOnly,
    /// Only triggers on the channel with this id.
    Channel(&'static str),
    Custom(fn(&ChannelTrigger) -> bool),
}

impl EventFilter {
    fn passes(&self, trigger: &ChannelTrigger) -> bool {
        match *self {
            EventFilter::All => true,
            EventFilter::PressedOnly => trigger.event.is_press(),
            EventFilter::ReleasedOnly => trigger.event.is_release(),
            EventFilter::Channel(id) => trigger.channel == id,
            EventFilter::Custom(f) => f(trigger),
        }
    }
}

/// Handle returned by [`TriggerBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Subscription {
    id: ListenerId,
    filter: EventFilter,
    /// Restricts delivery to one thing uid.
    thing: Option<String>,
    listener: Box<dyn TriggerListener>,
}

impl Subscription {
    fn wants(&self, trigger: &ChannelTrigger) -> bool {
        let thing_ok = self
            .thing
            .as_deref()
            .map_or(true, |uid| uid == trigger.thing_uid);
        thing_ok && self.filter.passes(trigger)
    }
}

/// Fans triggers out to subscribed listeners, in subscription order.
///
/// Handlers never call listeners directly: they push [`ChannelTrigger`]s into an
/// mpsc channel and the thread owning the bus consumes it with
/// [`drain`](Self::drain).
#[derive(Default)]
pub struct TriggerBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl TriggerBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        listener: impl TriggerListener + 'static,
        filter: EventFilter,
        thing: Option<String>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            thing,
            listener: Box::new(listener),
        });
        id
    }

    /// Drops a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Delivers one trigger to every subscription that wants it.
    pub fn emit(&mut self, trigger: &ChannelTrigger) {
        self.subscriptions
            .iter_mut()
            .filter(|s| s.wants(trigger))
            .for_each(|s| s.listener.on_trigger(trigger));
    }

    /// Emits everything currently queued on `rx` without blocking.
    ///
    /// Returns the number of triggers consumed.
    pub fn drain(&mut self, rx: &Receiver<ChannelTrigger>) -> usize {
        rx.try_iter().fold(0, |n, trigger| {
            self.emit(&trigger);
            n + 1
        })
    }
}
