//! §8 P7 — messages_in == messages_out + messages_dropped across a batch.

use proptest::prelude::*;
use snn_core::{SpikeMessage, Uid};
use snn_fabric::Bus;

proptest! {
    #[test]
    fn every_sent_message_is_routed_or_dropped_exactly_once(
        has_subscriber in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let bus = Bus::new();
        let receiver = Uid::fresh();
        let subscribed_sender = Uid::fresh();
        let unsubscribed_sender = Uid::fresh();
        bus.subscribe::<SpikeMessage>(receiver, [subscribed_sender]);

        let mut expected_routed = 0u64;
        let mut expected_dropped = 0u64;
        for &subscribed in &has_subscriber {
            let sender = if subscribed { subscribed_sender } else { unsubscribed_sender };
            if subscribed {
                expected_routed += 1;
            } else {
                expected_dropped += 1;
            }
            bus.send_message(SpikeMessage::new(sender, 0, vec![0]));
        }

        bus.route_messages();

        prop_assert_eq!(bus.messages_routed(), expected_routed);
        prop_assert_eq!(bus.messages_dropped(), expected_dropped);
        prop_assert_eq!(
            has_subscriber.len() as u64,
            bus.messages_routed() + bus.messages_dropped()
        );
    }
}
