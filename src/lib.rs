//! enocean-bridge — EnOcean rocker switches for smart-home items.
//!
//! Provisions rocker switches on a transceiver link, turns their attribute
//! updates into channel triggers, and translates those triggers into item
//! commands through trigger profiles.

pub mod address;
pub mod backends;
pub mod bridge;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod factory;
pub mod handler;
pub mod link;
pub mod logger;
pub mod profile;

pub use address::*;
pub use bridge::Bridge;
pub use command::*;
pub use config::*;
pub use device::*;
pub use error::{BridgeError, Result};
pub use event::*;
pub use eventbus::*;
pub use factory::*;
pub use handler::RockerHandler;
pub use link::*;
pub use profile::*;
