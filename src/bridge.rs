//! Wires config, factory, handlers, and profile links together.
//!
//! ```text
//! link layer ──attribute──▶ RockerHandler ──ChannelTrigger (mpsc)──▶ TriggerBus
//!                                                                   │
//!                          host ◀──ItemCommand (mpsc)── ProfileLink ◀┘
//! ```

use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::command::ItemState;
use crate::config::{BridgeConfig, LinkConfig};
use crate::device::Connector;
use crate::error::{BridgeError, Result};
use crate::event::{ChannelTrigger, Rocker};
use crate::eventbus::{EventFilter, ListenerId, TriggerBus, TriggerListener};
use crate::factory::HandlerFactory;
use crate::handler::RockerHandler;
use crate::link::{BoxedCallback, ItemCallback, ItemCommand, ProfileLink};
use crate::logger::TriggerLogger;
use crate::profile::{profile_type, ROCKER_CHANNEL_TYPE};

type SharedLink = Arc<Mutex<ProfileLink>>;

/// A running bridge instance.
pub struct Bridge {
    factory: HandlerFactory,
    handlers: Vec<RockerHandler>,
    links: Vec<SharedLink>,
    bus: TriggerBus,
    triggers: Receiver<ChannelTrigger>,
    trigger_tx: Sender<ChannelTrigger>,
}

impl Bridge {
    /// Starts a bridge and returns it with the receiver of item commands.
    ///
    /// Link failures and things without a usable device only produce log
    /// output. An unknown profile or channel, or an item type the profile does
    /// not support, is a configuration error.
    pub fn start(
        config: &BridgeConfig,
        connector: &dyn Connector,
    ) -> Result<(Self, Receiver<ItemCommand>)> {
        let (trigger_tx, triggers) = mpsc::channel();
        let (item_tx, items) = mpsc::channel();

        let mut factory = HandlerFactory::activate(config.serial_port.as_deref(), connector);
        let mut bus = TriggerBus::new();
        bus.subscribe(TriggerLogger::new(), EventFilter::All, None);

        let mut handlers = Vec::new();
        let mut links = Vec::new();
        for thing_cfg in &config.things {
            for link_cfg in &thing_cfg.links {
                let (rocker, link) = build_link(&thing_cfg.uid, link_cfg, item_tx.clone())?;
                let link = Arc::new(Mutex::new(link));
                bus.subscribe(
                    Arc::clone(&link),
                    EventFilter::Channel(rocker.channel_id()),
                    Some(thing_cfg.uid.clone()),
                );
                links.push(link);
            }
            match factory.create_handler(&thing_cfg.thing(), trigger_tx.clone()) {
                Some(handler) => handlers.push(handler),
                None => warn!("{}: no handler created, thing stays offline", thing_cfg.uid),
            }
        }
        info!(
            "bridge started: {} of {} thing(s) online, {} link(s)",
            handlers.len(),
            config.things.len(),
            links.len()
        );

        let bridge = Self {
            factory,
            handlers,
            links,
            bus,
            triggers,
            trigger_tx,
        };
        Ok((bridge, items))
    }

    pub fn is_link_active(&self) -> bool {
        self.factory.is_active()
    }

    pub fn handlers(&self) -> &[RockerHandler] {
        &self.handlers
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Sender for injecting triggers from other sources.
    pub fn trigger_sender(&self) -> Sender<ChannelTrigger> {
        self.trigger_tx.clone()
    }

    /// Registers an extra listener for triggers passing through the bridge.
    pub fn add_listener(
        &mut self,
        listener: impl TriggerListener + 'static,
        filter: EventFilter,
        thing: Option<String>,
    ) -> ListenerId {
        self.bus.subscribe(listener, filter, thing)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Processes every queued trigger. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        self.bus.drain(&self.triggers)
    }

    /// Forwards a host-side item state change to every profile linked to `item`.
    pub fn update_item_state(&mut self, item: &str, state: ItemState) {
        for link in &self.links {
            let mut link = link.lock().unwrap_or_else(|e| e.into_inner());
            if link.item() == item {
                link.on_item_state(&state);
            }
        }
    }
}

fn build_link(
    thing_uid: &str,
    cfg: &LinkConfig,
    items: Sender<ItemCommand>,
) -> Result<(Rocker, ProfileLink)> {
    let rocker = Rocker::from_channel_id(&cfg.channel).ok_or_else(|| BridgeError::UnknownChannel {
        thing: thing_uid.to_string(),
        channel: cfg.channel.clone(),
    })?;
    let profile_type =
        profile_type(&cfg.profile).ok_or_else(|| BridgeError::UnknownProfile(cfg.profile.clone()))?;
    if !profile_type.supports_channel_type(ROCKER_CHANNEL_TYPE) {
        return Err(BridgeError::UnknownChannel {
            thing: thing_uid.to_string(),
            channel: cfg.channel.clone(),
        });
    }
    if !profile_type.supports_item_type(cfg.item_type) {
        return Err(BridgeError::UnsupportedItemType {
            profile: cfg.profile.clone(),
            item_type: cfg.item_type.to_string(),
        });
    }

    let callback: BoxedCallback = Box::new(ItemCallback::new(cfg.item.clone(), items));
    let profile = profile_type.create(callback);
    debug!(
        "{thing_uid}/{} -> {} via {}",
        cfg.channel,
        cfg.item,
        profile.profile_type_uid()
    );
    Ok((rocker, ProfileLink::new(cfg.item.clone(), profile)))
}
