//! Subscription bookkeeping: which receivers accept which senders, for
//! which message type (§4.3)

use snn_core::Uid;
use std::any::TypeId;
use std::collections::HashSet;

/// Key identifying one subscription slot: a message type plus the
/// receiving entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    /// Rust type of the subscribed message
    pub message_type: TypeId,
    /// UID of the subscribing entity
    pub receiver_uid: Uid,
}

impl SubscriptionKey {
    /// Build a subscription key for message type `T` and `receiver_uid`
    pub fn new<T: 'static>(receiver_uid: Uid) -> Self {
        Self {
            message_type: TypeId::of::<T>(),
            receiver_uid,
        }
    }
}

/// A single subscription's accepted-sender set (§4.3). An entry with an
/// empty set is invalid and never stored; [`Subscription::accepts`] would
/// otherwise vacuously reject everything, which the bus treats the same as
/// having no subscription at all.
#[derive(Debug, Clone, Default)]
pub struct Subscription {
    senders: HashSet<Uid>,
}

impl Subscription {
    /// Build a subscription accepting exactly the given senders
    pub fn new(senders: impl IntoIterator<Item = Uid>) -> Self {
        Self {
            senders: senders.into_iter().collect(),
        }
    }

    /// `true` if `sender` is on the accepted list
    pub fn accepts(&self, sender: Uid) -> bool {
        self.senders.contains(&sender)
    }

    /// Add a sender to the accepted list, returning `true` if it was newly
    /// added (subscription is otherwise idempotent, §9 P8)
    pub fn add_sender(&mut self, sender: Uid) -> bool {
        self.senders.insert(sender)
    }

    /// Remove a sender from the accepted list
    pub fn remove_sender(&mut self, sender: Uid) -> bool {
        self.senders.remove(&sender)
    }

    /// `true` if no senders are accepted, meaning this subscription is dead
    /// weight and may be dropped
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub(crate) fn senders_mut(&mut self) -> &mut HashSet<Uid> {
        &mut self.senders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_accepts_only_listed_senders() {
        let a = Uid::fresh();
        let b = Uid::fresh();
        let sub = Subscription::new([a]);
        assert!(sub.accepts(a));
        assert!(!sub.accepts(b));
    }

    #[test]
    fn add_sender_is_idempotent() {
        let a = Uid::fresh();
        let mut sub = Subscription::new([]);
        assert!(sub.add_sender(a));
        assert!(!sub.add_sender(a));
        assert_eq!(sub.senders.len(), 1);
    }
}
