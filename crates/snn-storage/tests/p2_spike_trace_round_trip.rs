//! §8 P2 — a spike trace survives a JSON round trip intact.

use proptest::prelude::*;
use snn_core::Uid;
use snn_storage::SpikeTrace;

proptest! {
    #[test]
    fn round_trip_preserves_every_recorded_spike(
        spikes in prop::collection::vec((0u32..64, 0u64..10_000), 0..64),
    ) {
        let mut trace = SpikeTrace::new(Uid::fresh());
        for &(neuron_index, step) in &spikes {
            trace.push(neuron_index, step);
        }

        let mut buf = Vec::new();
        trace.write_json(&mut buf).unwrap();
        let read_back = SpikeTrace::read_json(&mut buf.as_slice()).unwrap();

        prop_assert_eq!(read_back, trace);
        prop_assert_eq!(read_back.len(), spikes.len());
    }
}
