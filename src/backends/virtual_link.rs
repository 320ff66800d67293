use crate::address::{DeviceAddress, Eep};
use crate::device::{AttributeListener, Connection, Connector, Device, DeviceListener};
use crate::error::{BridgeError, Result};
use crate::event::{AttributeValue, Rocker, RockerDirection};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

struct Registration {
    channel: u8,
    attribute: &'static str,
    listener: Box<dyn AttributeListener>,
}

#[derive(Default)]
struct Shared {
    listeners: HashMap<u32, Vec<Registration>>,
    known: HashSet<u32>,
    refused: HashSet<u32>,
    fail_connect: bool,
}

/// In-memory transceiver.
///
/// Acts as a [`Connector`] for one port name. Clones share state, so a test
/// can keep a handle after passing one to the factory and inject attribute
/// values with [`feed`](Self::feed).
#[derive(Clone)]
pub struct VirtualLink {
    port: String,
    shared: Arc<Mutex<Shared>>,
}

impl VirtualLink {
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes `connect` fail, as if the transceiver were unplugged.
    pub fn fail_connect(&self) {
        self.lock().fail_connect = true;
    }

    /// Makes the link ignore provisioning requests for `address`.
    pub fn refuse(&self, address: DeviceAddress) {
        self.lock().refused.insert(address.uid());
    }

    pub fn is_known(&self, address: DeviceAddress) -> bool {
        self.lock().known.contains(&address.uid())
    }

    /// Number of listeners registered for a device.
    pub fn listener_count(&self, address: DeviceAddress) -> usize {
        self.lock()
            .listeners
            .get(&address.uid())
            .map_or(0, |l| l.len())
    }

    /// Inject a decoded attribute value as if a telegram had arrived.
    ///
    /// Listeners run without the link's lock held, so they may call back
    /// into the link.
    pub fn feed(&self, address: DeviceAddress, channel: u8, value: AttributeValue) {
        let uid = address.uid();
        let Some(mut regs) = self.lock().listeners.remove(&uid) else {
            debug!("virtual link: no listeners for {address}");
            return;
        };
        for reg in regs
            .iter_mut()
            .filter(|r| r.channel == channel && r.attribute == value.name())
        {
            reg.listener.on_attribute(uid, channel, &value);
        }

        let mut shared = self.lock();
        let slot = shared.listeners.entry(uid).or_default();
        // keep registrations made during dispatch after the existing ones
        let added = std::mem::replace(slot, regs);
        slot.extend(added);
    }

    /// Convenience method for a rocker press.
    pub fn press(&self, address: DeviceAddress, rocker: Rocker, direction: RockerDirection) {
        self.feed(
            address,
            0,
            AttributeValue::RockerAction {
                rocker,
                direction,
                pressed: true,
            },
        );
    }

    pub fn release(&self, address: DeviceAddress, rocker: Rocker, direction: RockerDirection) {
        self.feed(
            address,
            0,
            AttributeValue::RockerAction {
                rocker,
                direction,
                pressed: false,
            },
        );
    }
}

impl Connector for VirtualLink {
    fn open(
        &self,
        serial_port: &str,
        listener: Box<dyn DeviceListener>,
    ) -> Result<Box<dyn Connection>> {
        if serial_port != self.port {
            return Err(BridgeError::Link {
                port: serial_port.to_string(),
                reason: "no such port".into(),
            });
        }
        Ok(Box::new(VirtualConnection {
            link: self.clone(),
            devices: HashMap::new(),
            listener,
            connected: false,
        }))
    }
}

pub struct VirtualConnection {
    link: VirtualLink,
    devices: HashMap<u32, VirtualDevice>,
    listener: Box<dyn DeviceListener>,
    connected: bool,
}

impl Connection for VirtualConnection {
    fn connect(&mut self) -> Result<()> {
        if self.link.lock().fail_connect {
            return Err(BridgeError::Link {
                port: self.link.port.clone(),
                reason: "transceiver not responding".into(),
            });
        }
        self.connected = true;
        Ok(())
    }

    fn add_new_device(&mut self, address: DeviceAddress, eep: Eep) -> Result<()> {
        if !self.connected {
            return Err(BridgeError::Link {
                port: self.link.port.clone(),
                reason: "link is not connected".into(),
            });
        }
        let uid = address.uid();
        {
            let mut shared = self.link.lock();
            if shared.refused.contains(&uid) {
                return Ok(());
            }
            shared.known.insert(uid);
        }
        let device = VirtualDevice {
            uid,
            eep,
            link: self.link.clone(),
        };
        if self.devices.insert(uid, device).is_some() {
            self.listener.modified_device(uid);
        } else {
            self.listener.added_device(uid);
        }
        Ok(())
    }

    fn device_mut(&mut self, uid: u32) -> Option<&mut dyn Device> {
        self.devices.get_mut(&uid).map(|d| d as &mut dyn Device)
    }
}

pub struct VirtualDevice {
    uid: u32,
    eep: Eep,
    link: VirtualLink,
}

impl Device for VirtualDevice {
    fn uid(&self) -> u32 {
        self.uid
    }

    fn eep(&self) -> Eep {
        self.eep
    }

    fn add_attribute_listener(
        &mut self,
        channel: u8,
        attribute: &'static str,
        listener: Box<dyn AttributeListener>,
    ) {
        self.link
            .lock()
            .listeners
            .entry(self.uid)
            .or_default()
            .push(Registration {
                channel,
                attribute,
                listener,
            });
    }
}
