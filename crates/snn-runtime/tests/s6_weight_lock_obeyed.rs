//! §8 S6 — a locked projection's weight stays untouched, though its spike
//! queues still accumulate and clear on the normal batch threshold.

use snn_core::connectors::one_to_one;
use snn_core::synapse_params::{DeltaSynapseParams, OutputType, StdpAdditiveSynapseParams};
use snn_core::{BlifatParams, Population, PopulationVariant, Projection, ProjectionVariant};
use snn_runtime::{Backend, BackendConfig};

fn neuron_at_rest() -> BlifatParams {
    BlifatParams::new(1.0, 1.0, 0.5, 1.0, 0.0, 0, 0.0, -1e9)
}

#[test]
fn locked_projection_ignores_learning_entirely() {
    let mut backend = Backend::new(BackendConfig::default()).unwrap();

    let a = backend.load_population(PopulationVariant::Blifat(Population::new(1, |_| neuron_at_rest())));
    let b = backend.load_population(PopulationVariant::Blifat(Population::new(1, |_| neuron_at_rest())));

    let pairs = one_to_one(1, 1);
    let projection = ProjectionVariant::StdpAdditive(Projection::new(
        a,
        b,
        true,
        pairs,
        |_, _| StdpAdditiveSynapseParams::new(DeltaSynapseParams::new(0.5, 1, OutputType::Excitatory), 1.0, 1.0),
    ));
    let projection_uid = backend.load_projection(projection).unwrap();

    backend.start_learning();
    backend.lock_weights(projection_uid).unwrap();
    backend.start().unwrap();

    // Fire A, then fire B once the impact lands, as in S4, but with the
    // projection locked throughout.
    if let Some(PopulationVariant::Blifat(population)) = backend.network_mut().population_mut(a) {
        population.neuron_mut(0).unwrap().potential = 1.0;
    }
    backend.step().unwrap();

    if let Some(PopulationVariant::Blifat(population)) = backend.network_mut().population_mut(b) {
        population.neuron_mut(0).unwrap().potential = 1.0;
    }
    backend.step().unwrap();
    backend.step().unwrap();

    let synapse = match backend.network().projection(projection_uid).unwrap() {
        ProjectionVariant::StdpAdditive(p) => p.synapse(0).unwrap(),
        _ => unreachable!(),
    };
    // tau_plus + tau_minus = 2, so the pre/post pair above crosses the batch
    // threshold and clears both queues; weight-lock only gates the write.
    assert_eq!(synapse.params.base.weight, 0.5);
    assert!(synapse.params.presynaptic_spike_times.is_empty());
    assert!(synapse.params.postsynaptic_spike_times.is_empty());
}
