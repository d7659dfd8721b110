//! Rayon-backed population/projection stepping (§4.6.4)
//!
//! Parallelism runs across populations and, separately, across projections:
//! within either group, each entity only ever touches its own neurons or
//! synapses plus read-only shared state (endpoints, this step's spike and
//! dopamine tallies), so splitting the `for` loop in
//! [`crate::backend::single_threaded`] into a `par_iter` is safe without any
//! extra locking. The synaptic-resource plasticity pass that follows needs a
//! projection and its presynaptic population mutable together and is left
//! sequential, reusing [`crate::backend::single_threaded::run_resource_plasticity`]
//! verbatim so both schedulers apply it identically.

use crate::backend::contract::{accumulate_inputs, Backend, PopulationStepOutput, ProjectionStepOutput};
use crate::backend::single_threaded::run_resource_plasticity;
use crate::kernels::{blifat, delta_synapse, stdp_additive};
use rayon::prelude::*;
use snn_core::{PopulationVariant, ProjectionVariant, StdpPopulationMode, Uid};

pub(crate) fn step_populations(backend: &mut Backend, pool: &rayon::ThreadPool) -> Vec<PopulationStepOutput> {
    let endpoints = &backend.endpoints;
    let entries: Vec<(Uid, &mut PopulationVariant)> =
        backend.network.populations_mut().map(|(&uid, v)| (uid, v)).collect();

    pool.install(|| {
        entries
            .into_par_iter()
            .map(|(uid, variant)| {
                let messages = endpoints
                    .get(&uid)
                    .map(|e| e.unload_messages::<snn_core::SynapticImpactMessage>())
                    .unwrap_or_default();

                let (spiked_indexes, dopamine_received) = match variant {
                    PopulationVariant::Blifat(population) => {
                        let (inputs, dopamine) = accumulate_inputs(population.size(), messages);
                        let mut spiked = Vec::new();
                        for (i, neuron) in population.iter_mut().enumerate() {
                            if blifat::step(neuron, &inputs[i]) {
                                spiked.push(i as u32);
                            }
                        }
                        (spiked, dopamine.iter().sum())
                    }
                    PopulationVariant::SynapticResourceStdpBlifat(population) => {
                        let (inputs, dopamine) = accumulate_inputs(population.size(), messages);
                        let mut spiked = Vec::new();
                        for (i, neuron) in population.iter_mut().enumerate() {
                            if blifat::step(&mut neuron.blifat, &inputs[i]) {
                                spiked.push(i as u32);
                            }
                        }
                        (spiked, dopamine.iter().sum())
                    }
                };

                PopulationStepOutput {
                    uid,
                    spiked_indexes,
                    dopamine_received,
                }
            })
            .collect()
    })
}

pub(crate) fn step_projections(backend: &mut Backend, pool: &rayon::ThreadPool) -> Vec<ProjectionStepOutput> {
    let current_step = backend.step;
    let learning_enabled = backend.learning_enabled;
    let endpoints = &backend.endpoints;

    let mut future_messages = std::mem::take(&mut backend.future_messages);
    let entries: Vec<(Uid, &mut ProjectionVariant, delta_synapse::FutureMessages)> = backend
        .network
        .projections_mut()
        .map(|(&uid, variant)| {
            let future = future_messages
                .remove(&uid)
                .expect("every loaded projection owns a future-message schedule");
            (uid, variant, future)
        })
        .collect();

    let outputs = pool.install(|| {
        entries
            .into_par_iter()
            .map(|(uid, variant, mut owned_future)| {
                let future = &mut owned_future;
                let messages = endpoints
                    .get(&uid)
                    .map(|e| e.unload_messages::<snn_core::SpikeMessage>())
                    .unwrap_or_default();

                let mut presynaptic_spikes: Vec<u32> = Vec::new();
                let mut postsynaptic_spikes: Vec<u32> = Vec::new();
                for message in messages {
                    match variant.stdp_population_mode(message.sender_uid) {
                        None => presynaptic_spikes.extend(message.neuron_indexes),
                        Some(StdpPopulationMode::StdpOnly) => {
                            postsynaptic_spikes.extend(message.neuron_indexes)
                        }
                        Some(StdpPopulationMode::StdpAndSpike) => {
                            postsynaptic_spikes.extend(message.neuron_indexes.iter().copied());
                            presynaptic_spikes.extend(message.neuron_indexes);
                        }
                    }
                }

                let presynaptic_uid = variant.presynaptic_uid();
                let postsynaptic_uid = variant.postsynaptic_uid();

                match variant {
                    ProjectionVariant::DeltaSynapse(projection) => {
                        delta_synapse::schedule_spikes(projection, &presynaptic_spikes, current_step, future);
                    }
                    ProjectionVariant::StdpAdditive(projection) => {
                        delta_synapse::schedule_spikes(projection, &presynaptic_spikes, current_step, future);
                        let apply = learning_enabled && projection.is_plastic;
                        for synapse in projection.synapses_mut() {
                            if presynaptic_spikes.contains(&synapse.source_index) {
                                stdp_additive::on_presynaptic_spike(&mut synapse.params, current_step, apply);
                            }
                            if postsynaptic_spikes.contains(&synapse.target_index) {
                                stdp_additive::on_postsynaptic_spike(&mut synapse.params, current_step, apply);
                            }
                        }
                    }
                    ProjectionVariant::StdpResource(projection) => {
                        delta_synapse::schedule_spikes(projection, &presynaptic_spikes, current_step, future);
                    }
                }

                if let Some(due) = future.take_due(current_step) {
                    if !due.is_empty() {
                        if let Some(endpoint) = endpoints.get(&uid) {
                            let is_forcing = matches!(variant, ProjectionVariant::StdpResource(_));
                            endpoint.send_message(snn_core::SynapticImpactMessage::new(
                                uid,
                                current_step,
                                presynaptic_uid,
                                postsynaptic_uid,
                                is_forcing,
                                due,
                            ));
                        }
                    }
                }

                (uid, owned_future, ProjectionStepOutput { uid })
            })
            .collect::<Vec<_>>()
    });

    let mut results = Vec::with_capacity(outputs.len());
    for (uid, future, output) in outputs {
        backend.future_messages.insert(uid, future);
        results.push(output);
    }

    if learning_enabled {
        run_resource_plasticity(backend, current_step);
    }

    results
}
