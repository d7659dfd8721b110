//! Sequential population/projection stepping (§4.6.4 baseline variant)

use crate::backend::contract::{accumulate_inputs, Backend, PopulationStepOutput, ProjectionStepOutput};
use crate::kernels::{blifat, delta_synapse, stdp_additive, stdp_resource};
use snn_core::{PopulationVariant, ProjectionVariant, StdpPopulationMode, Uid};

pub(crate) fn step_populations(backend: &mut Backend) -> Vec<PopulationStepOutput> {
    let mut outputs = Vec::with_capacity(backend.network.population_count());
    for (&uid, variant) in backend.network.populations_mut() {
        let messages = backend
            .endpoints
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

        outputs.push(PopulationStepOutput {
            uid,
            spiked_indexes,
            dopamine_received,
        });
    }
    outputs
}

pub(crate) fn step_projections(backend: &mut Backend) -> Vec<ProjectionStepOutput> {
    let mut outputs = Vec::with_capacity(backend.network.projection_count());
    let current_step = backend.step;
    let learning_enabled = backend.learning_enabled;

    for (&uid, variant) in backend.network.projections_mut() {
        let messages = backend
            .endpoints
            .get(&uid)
            .map(|e| e.unload_messages::<snn_core::SpikeMessage>())
            .unwrap_or_default();

        // Partition inbound spikes by sender: a sender unknown to
        // `stdp_populations` is forwarded as ordinary presynaptic input;
        // a tracked sender contributes to the postsynaptic queue instead
        // (or in addition, under `StdpAndSpike`) (§4.5.3).
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

        let future = backend
            .future_messages
            .get_mut(&uid)
            .expect("every loaded projection owns a future-message schedule");

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
                if let Some(endpoint) = backend.endpoints.get(&uid) {
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

        outputs.push(ProjectionStepOutput { uid });
    }

    if learning_enabled {
        run_resource_plasticity(backend, current_step);
    }

    outputs
}

/// Synaptic-resource STDP's Hebbian and dopamine updates need a projection
/// and its presynaptic population's neurons mutable at the same time, which
/// `projections_mut()` alone cannot give; this pass collects the affected
/// projection UIDs first, then resolves each one via
/// [`snn_core::Network::projection_and_population_mut`] (§4.6.3)
pub(crate) fn run_resource_plasticity(backend: &mut Backend, current_step: u64) {
    let resource_projection_uids: Vec<Uid> = backend
        .network
        .projections()
        .filter(|(_, v)| matches!(v, ProjectionVariant::StdpResource(p) if p.is_plastic))
        .map(|(&uid, _)| uid)
        .collect();

    for uid in resource_projection_uids {
        let Some(variant) = backend.network.projection(uid) else {
            continue;
        };
        let presynaptic_uid = variant.presynaptic_uid();
        let postsynaptic_uid = variant.postsynaptic_uid();
        let presynaptic_spikes = backend
            .spikes_this_step
            .get(&presynaptic_uid)
            .cloned()
            .unwrap_or_default();
        let dopamine = backend
            .dopamine_this_step
            .get(&postsynaptic_uid)
            .copied()
            .unwrap_or(0.0);

        let (proj, pop) = backend
            .network
            .projection_and_population_mut(uid, presynaptic_uid);
        let (
            Some(ProjectionVariant::StdpResource(projection)),
            Some(PopulationVariant::SynapticResourceStdpBlifat(population)),
        ) = (proj, pop)
        else {
            continue;
        };

        if !presynaptic_spikes.is_empty() {
            stdp_resource::process_spiking_neurons(
                projection,
                population.neurons_mut_slice(),
                &presynaptic_spikes,
                current_step,
            );
        }
        if dopamine != 0.0 {
            stdp_resource::do_dopamine_plasticity(
                projection,
                population.neurons_mut_slice(),
                dopamine,
                current_step,
            );
        }
        stdp_resource::renormalize_resource(projection, population.neurons_mut_slice(), current_step);
    }
}
