//! §8 P4/P5 — a delta synapse's scheduled delivery step is always
//! `send_time + delay - 1`, and never earlier than `send_time` itself.

use proptest::prelude::*;
use snn_core::synapse_params::{DeltaSynapseParams, OutputType};
use snn_core::{Projection, Uid};
use snn_runtime::kernels::delta_synapse::{schedule_spikes, FutureMessages};

proptest! {
    #[test]
    fn delivery_step_matches_send_time_plus_delay_minus_one(
        current_step in 0u64..10_000,
        delay in 1u32..50,
    ) {
        let mut projection = Projection::new(
            Uid::fresh(),
            Uid::fresh(),
            false,
            vec![(0, 0)],
            move |_, _| DeltaSynapseParams::new(1.0, delay, OutputType::Excitatory),
        );
        let mut future = FutureMessages::new();

        schedule_spikes(&mut projection, &[0], current_step, &mut future);

        let expected_delivery = current_step + delay as u64 - 1;
        prop_assert!(expected_delivery >= current_step);

        // Nothing is due before the computed delivery step.
        for probe in current_step..expected_delivery {
            prop_assert!(future.take_due(probe).is_none());
        }
        prop_assert!(future.take_due(expected_delivery).is_some());
    }
}
