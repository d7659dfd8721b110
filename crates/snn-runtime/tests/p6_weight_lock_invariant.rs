//! §8 P6 — a locked projection never changes weight, for any drive pattern.

use proptest::prelude::*;
use snn_core::connectors::one_to_one;
use snn_core::synapse_params::{DeltaSynapseParams, OutputType, StdpAdditiveSynapseParams};
use snn_core::{BlifatParams, Population, PopulationVariant, Projection, ProjectionVariant};
use snn_runtime::{Backend, BackendConfig};

fn neuron_at_rest() -> BlifatParams {
    BlifatParams::new(1.0, 1.0, 0.5, 1.0, 0.0, 0, 0.0, -1e9)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn locked_weights_never_move(
        drive_a in prop::collection::vec(any::<bool>(), 8),
        drive_b in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut backend = Backend::new(BackendConfig::default()).unwrap();
        let a = backend.load_population(PopulationVariant::Blifat(Population::new(1, |_| neuron_at_rest())));
        let b = backend.load_population(PopulationVariant::Blifat(Population::new(1, |_| neuron_at_rest())));
        let pairs = one_to_one(1, 1);
        let projection = ProjectionVariant::StdpAdditive(Projection::new(
            a,
            b,
            true,
            pairs,
            |_, _| StdpAdditiveSynapseParams::new(DeltaSynapseParams::new(0.5, 1, OutputType::Excitatory), 10.0, 10.0),
        ));
        let projection_uid = backend.load_projection(projection).unwrap();
        backend.start_learning();
        backend.lock_weights(projection_uid).unwrap();
        backend.start().unwrap();

        let weight_before = match backend.network().projection(projection_uid).unwrap() {
            ProjectionVariant::StdpAdditive(p) => p.synapse(0).unwrap().params.base.weight,
            _ => unreachable!(),
        };

        for (&fire_a, &fire_b) in drive_a.iter().zip(drive_b.iter()) {
            if fire_a {
                if let Some(PopulationVariant::Blifat(p)) = backend.network_mut().population_mut(a) {
                    p.neuron_mut(0).unwrap().potential = 1.0;
                }
            }
            if fire_b {
                if let Some(PopulationVariant::Blifat(p)) = backend.network_mut().population_mut(b) {
                    p.neuron_mut(0).unwrap().potential = 1.0;
                }
            }
            backend.step().unwrap();
        }

        let weight_after = match backend.network().projection(projection_uid).unwrap() {
            ProjectionVariant::StdpAdditive(p) => p.synapse(0).unwrap().params.base.weight,
            _ => unreachable!(),
        };
        prop_assert_eq!(weight_after, weight_before);
    }
}
