//! Device identifiers handed to the link layer.
//!
//! [`DeviceAddress`] is the 32-bit sender id printed on every EnOcean module and
//! [`Eep`] is the equipment profile identifier (`RORG-FUNC-TYPE`). Both are
//! opaque to this crate beyond parsing and display; the link layer decides
//! what they mean.
//!
//! # Accepted address forms
//! - Eight hex digits: `"0029F1B4"`, `"0x0029f1b4"`.
//! - Four hex octets with `:` or `-` separators: `"00:29:F1:B4"`, `"00-29-f1-b4"`.
//!
//! # Example
//! ```
//! use enocean_bridge::{DeviceAddress, Eep};
//!
//! let addr: DeviceAddress = "00:29:F1:B4".parse().unwrap();
//! assert_eq!(addr.uid(), 0x0029_F1B4);
//! assert_eq!(addr.to_string(), "0029F1B4");
//! assert_eq!("F6-02-02".parse::<Eep>().unwrap(), enocean_bridge::ROCKER_SWITCH_EEP);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// 32-bit EnOcean device id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAddress([u8; 4]);

impl DeviceAddress {
    /// Address bytes, most significant first (as transmitted).
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Numeric id the link layer uses to index devices.
    pub fn uid(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<u32> for DeviceAddress {
    fn from(uid: u32) -> Self {
        DeviceAddress(uid.to_be_bytes())
    }
}

impl FromStr for DeviceAddress {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BridgeError::InvalidAddress(s.to_string());
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let digits: String = if body.contains(':') || body.contains('-') {
            let parts: Vec<&str> = body.split(|c| c == ':' || c == '-').collect();
            if parts.len() != 4 || parts.iter().any(|p| p.len() != 2) {
                return Err(invalid());
            }
            parts.concat()
        } else {
            body.to_string()
        };

        if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let uid = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
        Ok(DeviceAddress::from(uid))
    }
}

impl TryFrom<String> for DeviceAddress {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DeviceAddress> for String {
    fn from(addr: DeviceAddress) -> Self {
        addr.to_string()
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.uid())
    }
}

/// EnOcean Equipment Profile identifier, e.g. `F6-02-02`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Eep {
    pub rorg: u8,
    pub func: u8,
    pub kind: u8,
}

/// Light and blind control, application style 2 (two-rocker switch).
pub const ROCKER_SWITCH_EEP: Eep = Eep {
    rorg: 0xF6,
    func: 0x02,
    kind: 0x02,
};

impl FromStr for Eep {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BridgeError::InvalidEep(s.to_string());
        let mut parts = s.trim().split('-');
        let mut next = || -> Result<u8, BridgeError> {
            let p = parts.next().ok_or_else(invalid)?;
            if p.len() != 2 {
                return Err(invalid());
            }
            u8::from_str_radix(p, 16).map_err(|_| invalid())
        };
        let eep = Eep {
            rorg: next()?,
            func: next()?,
            kind: next()?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(eep)
    }
}

impl fmt::Display for Eep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}-{:02X}-{:02X}", self.rorg, self.func, self.kind)
    }
}
