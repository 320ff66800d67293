//! Boundary to the EnOcean link layer.
//!
//! Serial framing, telegram parsing and EEP decoding live behind these traits.
//! The bridge only provisions devices, resolves them by uid, and attaches
//! attribute listeners.

use crate::address::{DeviceAddress, Eep};
use crate::error::Result;
use crate::event::AttributeValue;

/// Receives decoded attribute updates from one device.
pub trait AttributeListener: Send {
    fn on_attribute(&mut self, device_uid: u32, channel: u8, value: &AttributeValue);
}

/// Notified when the link layer's device registry changes.
pub trait DeviceListener: Send {
    fn added_device(&mut self, uid: u32);
    fn modified_device(&mut self, uid: u32);
    fn removed_device(&mut self, uid: u32);
}

pub trait Device {
    fn uid(&self) -> u32;
    fn eep(&self) -> Eep;
    /// Registers `listener` for `attribute` on the given EEP channel.
    fn add_attribute_listener(
        &mut self,
        channel: u8,
        attribute: &'static str,
        listener: Box<dyn AttributeListener>,
    );
}

/// An open connection to a transceiver.
pub trait Connection: Send {
    /// Brings the underlying serial link up.
    fn connect(&mut self) -> Result<()>;
    /// Teaches the connection a device it should decode telegrams for.
    fn add_new_device(&mut self, address: DeviceAddress, eep: Eep) -> Result<()>;
    fn device_mut(&mut self, uid: u32) -> Option<&mut dyn Device>;
}

/// Opens connections on a serial port.
pub trait Connector {
    fn open(
        &self,
        serial_port: &str,
        listener: Box<dyn DeviceListener>,
    ) -> Result<Box<dyn Connection>>;
}
