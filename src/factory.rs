use crate::address::{DeviceAddress, ROCKER_SWITCH_EEP};
use crate::device::{Connection, Connector, DeviceListener};
use crate::error::BridgeError;
use crate::event::{AttributeValue, ChannelTrigger};
use crate::handler::RockerHandler;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::Sender;

/// Identifies a thing type, displayed as `binding:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThingTypeUid {
    pub binding: String,
    pub id: String,
}

impl ThingTypeUid {
    pub fn new(binding: &str, id: &str) -> Self {
        Self {
            binding: binding.to_string(),
            id: id.to_string(),
        }
    }

    pub fn rocker_switch() -> Self {
        Self::new(crate::profile::BINDING_ID, THING_TYPE_ROCKER_SWITCH)
    }
}

/// Id of the only thing type this binding supports.
pub const THING_TYPE_ROCKER_SWITCH: &str = "rocker_switch";

impl FromStr for ThingTypeUid {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((b, id)) if !b.is_empty() && !id.is_empty() && !id.contains(':') => {
                Ok(Self::new(b, id))
            }
            _ => Err(BridgeError::InvalidUid(s.to_string())),
        }
    }
}

impl TryFrom<String> for ThingTypeUid {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ThingTypeUid> for String {
    fn from(uid: ThingTypeUid) -> Self {
        uid.to_string()
    }
}

impl fmt::Display for ThingTypeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.binding, self.id)
    }
}

/// A configured device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thing {
    pub uid: String,
    pub thing_type: ThingTypeUid,
    /// Textual EnOcean id from the thing configuration.
    pub enocean_address: Option<String>,
}

/// Device registry listener that only logs.
#[derive(Default)]
pub struct DeviceEventLog;

impl DeviceListener for DeviceEventLog {
    fn added_device(&mut self, uid: u32) {
        debug!("link added device {uid:08X}");
    }

    fn modified_device(&mut self, uid: u32) {
        debug!("link modified device {uid:08X}");
    }

    fn removed_device(&mut self, uid: u32) {
        debug!("link removed device {uid:08X}");
    }
}

/// Creates thing handlers on top of one transceiver connection.
///
/// A factory without a connection is valid: it simply creates no handlers.
#[derive(Default)]
pub struct HandlerFactory {
    connection: Option<Box<dyn Connection>>,
}

impl HandlerFactory {
    /// Opens and connects the link on `serial_port`.
    ///
    /// Failures are logged and leave the factory inactive; they never abort.
    pub fn activate(serial_port: Option<&str>, connector: &dyn Connector) -> Self {
        let Some(port) = serial_port else {
            info!("no serial port configured, EnOcean link disabled");
            return Self::default();
        };

        let connection = connector
            .open(port, Box::new(DeviceEventLog))
            .and_then(|mut conn| {
                conn.connect()?;
                Ok(conn)
            });

        match connection {
            Ok(conn) => {
                info!("EnOcean link up on {port}");
                Self::with_connection(conn)
            }
            Err(e) => {
                debug!("the given port does not exist or no device is plugged in: {e}");
                Self::default()
            }
        }
    }

    /// Wraps an already connected link.
    pub fn with_connection(connection: Box<dyn Connection>) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    pub fn supports_thing_type(&self, thing_type: &ThingTypeUid) -> bool {
        thing_type.binding == crate::profile::BINDING_ID && thing_type.id == THING_TYPE_ROCKER_SWITCH
    }

    /// Provisions the thing's device and attaches a handler to it.
    ///
    /// Returns `None` when the thing type is unsupported, the link is down, the
    /// address is missing or malformed, or the device cannot be resolved.
    pub fn create_handler(
        &mut self,
        thing: &Thing,
        triggers: Sender<ChannelTrigger>,
    ) -> Option<RockerHandler> {
        if !self.supports_thing_type(&thing.thing_type) {
            trace!("{}: unsupported thing type {}", thing.uid, thing.thing_type);
            return None;
        }
        let connection = self.connection.as_mut()?;

        let address = match thing.enocean_address.as_deref().map(DeviceAddress::from_str) {
            Some(Ok(address)) => address,
            Some(Err(e)) => {
                warn!("{}: {e}", thing.uid);
                return None;
            }
            None => {
                warn!("{}: no enoceanAddress configured", thing.uid);
                return None;
            }
        };

        if let Err(e) = connection.add_new_device(address, ROCKER_SWITCH_EEP) {
            warn!("{}: cannot provision {address}: {e}", thing.uid);
            return None;
        }
        let Some(device) = connection.device_mut(address.uid()) else {
            warn!("{}: device {address} did not resolve", thing.uid);
            return None;
        };

        let handler = RockerHandler::new(thing.uid.clone(), triggers);
        device.add_attribute_listener(0, AttributeValue::ROCKER_ACTION, Box::new(handler.clone()));
        device.add_attribute_listener(0, AttributeValue::BUTTON_COUNT, Box::new(handler.clone()));
        debug!("{}: handler attached to {address} ({})", thing.uid, device.eep());
        Some(handler)
    }
}

#[cfg(all(test, feature = "virtual"))]
mod tests {
    use super::*;
    use crate::backends::VirtualLink;
    use crate::event::{Rocker, RockerDirection};
    use std::sync::mpsc;

    const PORT: &str = "/dev/ttyV0";

    fn rocker(uid: &str, address: Option<&str>) -> Thing {
        Thing {
            uid: uid.to_string(),
            thing_type: ThingTypeUid::rocker_switch(),
            enocean_address: address.map(str::to_string),
        }
    }

    #[test]
    fn thing_type_uid_parses() {
        let t: ThingTypeUid = "enocean:rocker_switch".parse().unwrap();
        assert_eq!(t, ThingTypeUid::rocker_switch());
        assert!("rocker_switch".parse::<ThingTypeUid>().is_err());
        assert!("a:b:c".parse::<ThingTypeUid>().is_err());
        assert!(":x".parse::<ThingTypeUid>().is_err());
    }

    #[test]
    fn missing_port_or_failed_link_leaves_factory_inactive() {
        let link = VirtualLink::new(PORT);
        assert!(!HandlerFactory::activate(None, &link).is_active());
        assert!(!HandlerFactory::activate(Some("/dev/ttyUSB7"), &link).is_active());

        link.fail_connect();
        let mut factory = HandlerFactory::activate(Some(PORT), &link);
        assert!(!factory.is_active());

        let (tx, _rx) = mpsc::channel();
        assert!(factory.create_handler(&rocker("t", Some("01020304")), tx).is_none());
    }

    #[test]
    fn creates_handler_and_registers_both_attributes() {
        let link = VirtualLink::new(PORT);
        let mut factory = HandlerFactory::activate(Some(PORT), &link);
        assert!(factory.is_active());

        let (tx, rx) = mpsc::channel();
        let handler = factory
            .create_handler(&rocker("enocean:rocker_switch:hall", Some("00:29:F1:B4")), tx)
            .unwrap();
        assert_eq!(handler.thing_uid(), "enocean:rocker_switch:hall");

        let addr: DeviceAddress = "0029F1B4".parse().unwrap();
        assert!(link.is_known(addr));
        assert_eq!(link.listener_count(addr), 2);

        link.press(addr, Rocker::A, RockerDirection::Up);
        let t = rx.try_recv().unwrap();
        assert_eq!(t.channel, "rocker_a");
        assert_eq!(t.event.as_str(), "UP_PRESSED");
    }

    #[test]
    fn unusable_things_get_no_handler() {
        let link = VirtualLink::new(PORT);
        let refused = DeviceAddress::from(0xAABB_CCDD);
        link.refuse(refused);
        let mut factory = HandlerFactory::activate(Some(PORT), &link);
        let (tx, _rx) = mpsc::channel();

        let mut other = rocker("x", Some("01020304"));
        other.thing_type = ThingTypeUid::new("enocean", "window_handle");
        assert!(!factory.supports_thing_type(&other.thing_type));
        assert!(factory.create_handler(&other, tx.clone()).is_none());

        assert!(factory.create_handler(&rocker("a", None), tx.clone()).is_none());
        assert!(factory.create_handler(&rocker("b", Some("nope")), tx.clone()).is_none());
        assert!(factory
            .create_handler(&rocker("c", Some("AABBCCDD")), tx)
            .is_none());
    }
}
