//! Per-entity handle onto a [`Bus`] (§4.3)
//!
//! An [`Endpoint`] is the piece of fabric a population, projection, or
//! backend actually holds; it pins its own UID so callers never have to
//! pass it on every call, mirroring how each entity owns one endpoint for
//! its whole lifetime.

use crate::bus::Bus;
use crate::message::BusMessage;
use snn_core::Uid;

/// A bound handle onto a [`Bus`] for one entity
#[derive(Clone)]
pub struct Endpoint {
    bus: Bus,
    own_uid: Uid,
}

impl Endpoint {
    /// Build an endpoint for `own_uid` backed by `bus`
    pub fn new(bus: Bus, own_uid: Uid) -> Self {
        Self { bus, own_uid }
    }

    /// UID this endpoint receives and sends as
    pub fn uid(&self) -> Uid {
        self.own_uid
    }

    /// Subscribe to messages of type `T` from `senders`
    pub fn subscribe<T: BusMessage + 'static>(&self, senders: impl IntoIterator<Item = Uid>) {
        self.bus.subscribe::<T>(self.own_uid, senders);
    }

    /// Remove this endpoint's subscription to message type `T`
    pub fn unsubscribe<T: BusMessage + 'static>(&self) {
        self.bus.unsubscribe::<T>(self.own_uid);
    }

    /// Enqueue a message, stamped with this endpoint's own UID as sender.
    /// Callers that already produced a fully formed message with its own
    /// `sender_uid` set may instead call [`Bus::send_message`] directly;
    /// this entry point exists for the common case where the message
    /// already carries this endpoint's UID.
    pub fn send_message<T: BusMessage + Clone + 'static>(&self, message: T) {
        self.bus.send_message(message);
    }

    /// Drain every message of type `T` delivered to this endpoint since the
    /// last call
    pub fn unload_messages<T: BusMessage + 'static>(&self) -> Vec<T> {
        self.bus.unload_messages::<T>(self.own_uid)
    }

    /// Discard every queued message of type `T` without reading it
    pub fn receive_all_messages<T: BusMessage + 'static>(&self) {
        self.bus.receive_all_messages::<T>(self.own_uid);
    }

    /// The bus backing this endpoint
    pub fn bus(&self) -> &Bus {
        &self.bus
    }
}
