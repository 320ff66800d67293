//! Link backends for `enocean-bridge`.
//!
//! Implementations of [`Connector`](crate::device::Connector) the bridge can be
//! started with. The real serial transceiver stack is an external library that
//! a host plugs in through the same trait.
//!
//! # Feature flags
//! - **`virtual`** — in-memory transceiver for tests and demos (default).

#[cfg(feature = "virtual")]
#[cfg_attr(docsrs, doc(cfg(feature = "virtual")))]
pub mod virtual_link;

#[cfg(feature = "virtual")]
pub use virtual_link::VirtualLink;
