//! Error type shared by the bridge.
//!
//! Unrecognized trigger symbols are never errors; they are dropped by the
//! profiles. Errors here cover configuration, identifiers, and the link boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid EnOcean address {0:?}")]
    InvalidAddress(String),

    #[error("invalid equipment profile {0:?}")]
    InvalidEep(String),

    #[error("invalid uid {0:?} (expected `binding:id`)")]
    InvalidUid(String),

    #[error("unknown item type {0:?}")]
    UnknownItemType(String),

    #[error("unknown profile type {0}")]
    UnknownProfile(String),

    #[error("profile {profile} does not support {item_type} items")]
    UnsupportedItemType { profile: String, item_type: String },

    #[error("serial link unavailable on {port}: {reason}")]
    Link { port: String, reason: String },

    #[error("thing {thing} has no trigger channel {channel:?}")]
    UnknownChannel { thing: String, channel: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to encode profile description: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
