//! The message bus: routes messages from senders to subscribed receivers
//! (§4.3)

use crate::message::BusMessage;
use crate::subscription::{Subscription, SubscriptionKey};
use parking_lot::Mutex;
use snn_core::Uid;
use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Clones a type-erased payload known (by construction) to be a `T`. Stored
/// alongside the payload so that `route_messages` can fan a message out to
/// several subscribers without `BusMessage` itself needing an object-safe
/// `clone`.
type CloneFn = fn(&(dyn Any + Send)) -> Box<dyn Any + Send>;

fn clone_fn<T: Clone + Send + 'static>(payload: &(dyn Any + Send)) -> Box<dyn Any + Send> {
    let typed = payload
        .downcast_ref::<T>()
        .expect("envelope payload type tag always matches T");
    Box::new(typed.clone())
}

struct Envelope {
    message_type: TypeId,
    sender_uid: Uid,
    payload: Box<dyn Any + Send>,
    clone_fn: CloneFn,
}

impl Envelope {
    fn duplicate(&self) -> Self {
        Self {
            message_type: self.message_type,
            sender_uid: self.sender_uid,
            payload: (self.clone_fn)(self.payload.as_ref()),
            clone_fn: self.clone_fn,
        }
    }
}

pub(crate) struct BusInner {
    subscriptions: HashMap<SubscriptionKey, Subscription>,
    pending: Vec<Envelope>,
    inboxes: HashMap<SubscriptionKey, VecDeque<Envelope>>,
    messages_routed: u64,
    messages_dropped: u64,
}

impl BusInner {
    fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            pending: Vec::new(),
            inboxes: HashMap::new(),
            messages_routed: 0,
            messages_dropped: 0,
        }
    }
}

/// A shared, thread-safe message bus
///
/// Construction mirrors the two transports named in §4.3: [`Bus::new`]
/// builds the in-process variant every backend uses by default, and the
/// `zmq-transport` feature adds a process-crossing variant for deployments
/// that need one (the fabric's public API is identical either way).
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Mutex<BusInner>>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Construct an empty, in-process bus
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner::new())),
        }
    }

    /// Subscribe `receiver_uid` to messages of type `T` from `senders`.
    /// Subscribing again with an overlapping sender set is a no-op for the
    /// overlap and adds any new senders (subscription is idempotent, P8).
    pub fn subscribe<T: BusMessage + 'static>(
        &self,
        receiver_uid: Uid,
        senders: impl IntoIterator<Item = Uid>,
    ) {
        let key = SubscriptionKey::new::<T>(receiver_uid);
        let mut inner = self.inner.lock();
        inner
            .subscriptions
            .entry(key)
            .or_default()
            .senders_mut()
            .extend(senders);
    }

    /// Remove `receiver_uid`'s subscription to message type `T` entirely
    pub fn unsubscribe<T: BusMessage + 'static>(&self, receiver_uid: Uid) {
        let key = SubscriptionKey::new::<T>(receiver_uid);
        let mut inner = self.inner.lock();
        inner.subscriptions.remove(&key);
        inner.inboxes.remove(&key);
    }

    /// Remove every subscription held by `receiver_uid`, across all message
    /// types. Used when an entity is deleted from the network.
    pub fn remove_receiver(&self, receiver_uid: Uid) {
        let mut inner = self.inner.lock();
        inner
            .subscriptions
            .retain(|key, _| key.receiver_uid != receiver_uid);
        inner.inboxes.retain(|key, _| key.receiver_uid != receiver_uid);
    }

    /// Enqueue a message for routing on the next [`Bus::route_messages`]
    /// call. Sending from [`Uid::nil`] is a no-op (§4.3): nil is reserved
    /// for input channels that never have a subscribable identity of their
    /// own.
    pub fn send_message<T: BusMessage + Clone + 'static>(&self, message: T) {
        if message.sender_uid().is_nil() {
            return;
        }
        let envelope = Envelope {
            message_type: TypeId::of::<T>(),
            sender_uid: message.sender_uid(),
            payload: Box::new(message),
            clone_fn: clone_fn::<T>,
        };
        self.inner.lock().pending.push(envelope);
    }

    /// Deliver every pending message to every subscription that accepts
    /// its sender. A message matching zero subscriptions is dropped and
    /// counted (P7); a message matching several is delivered to each
    /// (exactly once per matching subscription).
    pub fn route_messages(&self) {
        let mut inner = self.inner.lock();
        let pending = std::mem::take(&mut inner.pending);
        for envelope in pending {
            let matching: Vec<SubscriptionKey> = inner
                .subscriptions
                .iter()
                .filter(|(key, sub)| {
                    key.message_type == envelope.message_type && sub.accepts(envelope.sender_uid)
                })
                .map(|(key, _)| *key)
                .collect();

            if matching.is_empty() {
                inner.messages_dropped += 1;
                continue;
            }

            inner.messages_routed += 1;
            let last = matching.len() - 1;
            let mut envelope = Some(envelope);
            for (i, key) in matching.into_iter().enumerate() {
                let delivered = if i == last {
                    envelope.take().unwrap()
                } else {
                    envelope.as_ref().unwrap().duplicate()
                };
                inner.inboxes.entry(key).or_default().push_back(delivered);
            }
        }
    }

    /// Drain and return every message of type `T` delivered so far to
    /// `receiver_uid`, oldest first
    pub fn unload_messages<T: BusMessage + 'static>(&self, receiver_uid: Uid) -> Vec<T> {
        let key = SubscriptionKey::new::<T>(receiver_uid);
        let mut inner = self.inner.lock();
        let Some(inbox) = inner.inboxes.get_mut(&key) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(inbox.len());
        while let Some(envelope) = inbox.pop_front() {
            if let Ok(msg) = envelope.payload.downcast::<T>() {
                out.push(*msg);
            }
        }
        out
    }

    /// Discard every message of type `T` queued for `receiver_uid` without
    /// returning them
    pub fn receive_all_messages<T: BusMessage + 'static>(&self, receiver_uid: Uid) {
        let key = SubscriptionKey::new::<T>(receiver_uid);
        self.inner.lock().inboxes.remove(&key);
    }

    /// Run one fabric step: currently identical to [`Bus::route_messages`].
    /// Kept as a distinct entry point because a future transport (e.g. the
    /// ZMQ backend) may need a separate poll phase here.
    pub fn step(&self) {
        self.route_messages();
    }

    /// Total messages successfully routed to at least one subscriber
    pub fn messages_routed(&self) -> u64 {
        self.inner.lock().messages_routed
    }

    /// Total messages dropped for lack of any matching subscription
    pub fn messages_dropped(&self) -> u64 {
        self.inner.lock().messages_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snn_core::SpikeMessage;

    #[test]
    fn send_without_subscription_is_dropped() {
        let bus = Bus::new();
        bus.send_message(SpikeMessage::new(Uid::fresh(), 0, vec![1]));
        bus.route_messages();
        assert_eq!(bus.messages_dropped(), 1);
        assert_eq!(bus.messages_routed(), 0);
    }

    #[test]
    fn subscribed_receiver_gets_message() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [sender]);
        bus.send_message(SpikeMessage::new(sender, 3, vec![5, 6]));
        bus.route_messages();
        let received = bus.unload_messages::<SpikeMessage>(receiver);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].neuron_indexes, vec![5, 6]);
        assert_eq!(bus.messages_routed(), 1);
    }

    #[test]
    fn unsubscribed_sender_is_dropped() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let other = Uid::fresh();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [other]);
        bus.send_message(SpikeMessage::new(sender, 1, vec![]));
        bus.route_messages();
        assert!(bus.unload_messages::<SpikeMessage>(receiver).is_empty());
        assert_eq!(bus.messages_dropped(), 1);
    }

    #[test]
    fn nil_sender_is_a_no_op() {
        let bus = Bus::new();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [Uid::nil()]);
        bus.send_message(SpikeMessage::new(Uid::nil(), 1, vec![1]));
        bus.route_messages();
        assert!(bus.unload_messages::<SpikeMessage>(receiver).is_empty());
        assert_eq!(bus.messages_dropped(), 0);
        assert_eq!(bus.messages_routed(), 0);
    }

    #[test]
    fn receive_all_discards_without_returning() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [sender]);
        bus.send_message(SpikeMessage::new(sender, 1, vec![1]));
        bus.route_messages();
        bus.receive_all_messages::<SpikeMessage>(receiver);
        assert!(bus.unload_messages::<SpikeMessage>(receiver).is_empty());
    }

    #[test]
    fn subscribing_twice_is_idempotent() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [sender]);
        bus.subscribe::<SpikeMessage>(receiver, [sender]);
        bus.send_message(SpikeMessage::new(sender, 1, vec![9]));
        bus.route_messages();
        let received = bus.unload_messages::<SpikeMessage>(receiver);
        assert_eq!(received.len(), 1);
    }

    #[test]
    fn remove_receiver_clears_all_its_subscriptions() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let receiver = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [sender]);
        bus.remove_receiver(receiver);
        bus.send_message(SpikeMessage::new(sender, 1, vec![1]));
        bus.route_messages();
        assert!(bus.unload_messages::<SpikeMessage>(receiver).is_empty());
        assert_eq!(bus.messages_dropped(), 1);
    }

    #[test]
    fn message_fans_out_to_every_matching_subscriber() {
        let bus = Bus::new();
        let sender = Uid::fresh();
        let r1 = Uid::fresh();
        let r2 = Uid::fresh();
        bus.subscribe::<SpikeMessage>(r1, [sender]);
        bus.subscribe::<SpikeMessage>(r2, [sender]);
        bus.send_message(SpikeMessage::new(sender, 1, vec![1]));
        bus.route_messages();
        assert_eq!(bus.unload_messages::<SpikeMessage>(r1).len(), 1);
        assert_eq!(bus.unload_messages::<SpikeMessage>(r2).len(), 1);
        assert_eq!(bus.messages_routed(), 1);
    }
}
