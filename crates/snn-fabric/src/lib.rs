//! Typed publish/subscribe message fabric for the SNN simulator
//!
//! Populations and projections never address each other directly; every
//! message passes through a [`Bus`] via the sender's [`Endpoint`]. A
//! receiver only sees a message if it previously [`Endpoint::subscribe`]d
//! to that message's Rust type from that specific sender UID (§4.3).
//!
//! [`Bus::route_messages`] performs delivery; nothing is visible to a
//! receiver until that call runs, even if the message was sent moments
//! earlier. This two-phase send/route split is what lets `snn-runtime`'s
//! backends give every population and projection a consistent view of "this
//! step's incoming messages" regardless of scheduling order.

#![warn(missing_docs)]

pub mod bus;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod subscription;

#[cfg(feature = "zmq-transport")]
pub mod zmq_transport;

pub use bus::Bus;
pub use endpoint::Endpoint;
pub use error::{FabricError, Result};
pub use message::BusMessage;
pub use subscription::{Subscription, SubscriptionKey};

/// Version of the crate, exposed for diagnostics and storage manifests
pub const FABRIC_VERSION: &str = env!("CARGO_PKG_VERSION");
