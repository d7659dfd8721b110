//! §8 S3 — one-to-one connector.

use snn_core::connectors::one_to_one;
use snn_core::synapse_params::{DeltaSynapseParams, OutputType};
use snn_core::{BlifatParams, Population, PopulationVariant, Projection, ProjectionVariant};
use snn_runtime::{Backend, BackendConfig};

fn neuron_at_rest() -> BlifatParams {
    // potential_decay=1.0 per the scenario; the other fields are left at
    // values that keep a single suprathreshold step from cascading into a
    // refiring loop.
    BlifatParams::new(1.0, 1.0, 0.5, 1.0, 0.0, 1, 0.0, -1e9)
}

#[test]
fn one_to_one_spike_propagates_with_unit_delay() {
    let mut backend = Backend::new(BackendConfig::default()).unwrap();

    let a = backend.load_population(PopulationVariant::Blifat(Population::new(5, |_| neuron_at_rest())));
    let b = backend.load_population(PopulationVariant::Blifat(Population::new(5, |_| neuron_at_rest())));

    let pairs = one_to_one(5, 5);
    let projection = ProjectionVariant::DeltaSynapse(Projection::new(
        a,
        b,
        false,
        pairs,
        |_, _| DeltaSynapseParams::new(1.0, 1, OutputType::Excitatory),
    ));
    backend.load_projection(projection).unwrap();
    backend.start().unwrap();

    // Drive A's neurons 0, 2, 4 over threshold for this step only.
    if let Some(PopulationVariant::Blifat(population)) = backend.network_mut().population_mut(a) {
        for &idx in &[0usize, 2, 4] {
            population.neuron_mut(idx).unwrap().potential = 1.0;
        }
    }

    backend.step().unwrap(); // step 0: A fires [0, 2, 4], B stays at rest

    let b_population = match backend.network().population(b).unwrap() {
        PopulationVariant::Blifat(p) => p,
        _ => unreachable!(),
    };
    assert!(b_population.iter().all(|n| n.total_spikes == 0));

    backend.step().unwrap(); // step 1: B receives the delay-1 impact and fires

    let b_population = match backend.network().population(b).unwrap() {
        PopulationVariant::Blifat(p) => p,
        _ => unreachable!(),
    };
    let fired: Vec<usize> = b_population
        .iter()
        .enumerate()
        .filter(|(_, n)| n.total_spikes == 1)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fired, vec![0, 2, 4]);
}
