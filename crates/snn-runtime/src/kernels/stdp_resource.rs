//! Synaptic-resource STDP kernel (§4.5.4)
//!
//! Resource changes are driven by **presynaptic** spikes: when a
//! presynaptic neuron fires, every one of its outgoing synapses in the
//! projection is found by searching [`snn_core::Search::ByPresynaptic`],
//! per the §10.7 resolution of the original's ambiguous
//! `process_spiking_neurons` naming. Each such synapse drains `d_u` of its
//! resource into the presynaptic neuron's `free_synaptic_resource` pool and
//! gets a one-per-ISI-period Hebbian top-up; dopamine plasticity and the
//! resource renormalization pass both run once per step over the whole
//! population, independent of which neurons spiked this step.

use snn_core::projection::Projection;
use snn_core::neuron_params::{IsiStatus, SynapticResourceStdpNeuronParams};
use snn_core::synapse_params::StdpResourceSynapseParams;

/// Update one neuron's ISI state machine for a spike observed at `step`,
/// per the §4.5.4 transition table
pub fn update_isi(neuron: &mut SynapticResourceStdpNeuronParams, step: u64, is_forced: bool) {
    if is_forced {
        neuron.isi_status = IsiStatus::IsForced;
        return;
    }

    let gap = step.saturating_sub(neuron.last_isi_spike_step);
    let within_window = gap < neuron.isi_max as u64;
    let prior_status = neuron.isi_status;

    neuron.isi_status = match (prior_status, within_window) {
        (IsiStatus::NotInPeriod, _) => IsiStatus::PeriodStarted,
        (IsiStatus::IsForced, _) => IsiStatus::PeriodStarted,
        (IsiStatus::PeriodStarted, true) => IsiStatus::PeriodContinued,
        (IsiStatus::PeriodStarted, false) => IsiStatus::PeriodStarted,
        (IsiStatus::PeriodContinued, true) => IsiStatus::PeriodContinued,
        (IsiStatus::PeriodContinued, false) => IsiStatus::NotInPeriod,
    };

    if neuron.isi_status == IsiStatus::PeriodStarted && prior_status != IsiStatus::PeriodStarted {
        neuron.first_isi_spike = step;
        neuron.stability -= neuron.stability_change_at_isi;
    }

    neuron.last_isi_spike_step = step;
}

/// For every presynaptic neuron that spiked this step: advance its ISI
/// state, drain `d_u` from each outgoing synapse into its free pool, and
/// apply the once-per-ISI-period Hebbian top-up
pub fn process_spiking_neurons(
    projection: &mut Projection<StdpResourceSynapseParams>,
    neurons: &mut [SynapticResourceStdpNeuronParams],
    spiked_indexes: &[u32],
    step: u64,
) {
    let by_presynaptic = projection.by_presynaptic().clone();
    for &source_index in spiked_indexes {
        let Some(neuron) = neurons.get_mut(source_index as usize) else {
            continue;
        };

        update_isi(neuron, step, neuron.is_being_forced);

        if neuron.isi_status == IsiStatus::IsForced {
            continue;
        }

        let Some(synapse_slots) = by_presynaptic.get(&source_index) else {
            continue;
        };

        if neuron.isi_status != IsiStatus::PeriodContinued {
            for &slot in synapse_slots {
                if let Some(synapse) = projection.synapse_mut(slot as usize) {
                    synapse.params.had_hebbian_update = false;
                }
            }
        }

        for &slot in synapse_slots {
            if let Some(synapse) = projection.synapse_mut(slot as usize) {
                synapse.params.synaptic_resource -= synapse.params.d_u;
                neuron.free_synaptic_resource += synapse.params.d_u;
                synapse.params.last_spike_step = step;

                if !synapse.params.had_hebbian_update {
                    let d_h = neuron.d_h * 2f32.powf(-neuron.stability).min(1.0);
                    synapse.params.synaptic_resource += d_h;
                    neuron.free_synaptic_resource -= d_h;
                    synapse.params.had_hebbian_update = true;
                }

                synapse.params.recalculate_weight();
            }
        }
    }
}

/// Apply a dopamine signal to every synapse still within its dopamine
/// plasticity window, scaling the resource change by the presynaptic
/// neuron's stability, then update that neuron's stability (§4.5.4)
pub fn do_dopamine_plasticity(
    projection: &mut Projection<StdpResourceSynapseParams>,
    neurons: &mut [SynapticResourceStdpNeuronParams],
    dopamine_value: f32,
    step: u64,
) {
    if dopamine_value == 0.0 {
        return;
    }

    for source_index in 0..neurons.len() {
        let by_presynaptic = projection.by_presynaptic().clone();
        let Some(synapse_slots) = by_presynaptic.get(&(source_index as u32)) else {
            continue;
        };
        let Some(neuron) = neurons.get_mut(source_index) else {
            continue;
        };

        if dopamine_value < 0.0 && neuron.isi_status == IsiStatus::IsForced {
            continue;
        }

        for &slot in synapse_slots {
            let Some(synapse) = projection.synapse_mut(slot as usize) else {
                continue;
            };
            let elapsed = step.saturating_sub(synapse.params.last_spike_step);
            if elapsed >= synapse.params.dopamine_plasticity_period {
                continue;
            }
            let d_r = dopamine_value * 2f32.powf(-neuron.stability).min(1.0) / 1000.0;
            synapse.params.synaptic_resource += d_r;
            neuron.free_synaptic_resource -= d_r;
            synapse.params.recalculate_weight();
        }

        if neuron.is_being_forced || dopamine_value < 0.0 {
            neuron.stability -= dopamine_value * neuron.stability_change_parameter;
            neuron.stability = neuron.stability.max(0.0);
        } else {
            let difference = step as f64 - neuron.first_isi_spike as f64 - neuron.isi_max as f64;
            let isi_max = neuron.isi_max as f64;
            let bounded = (2.0 - difference.abs() / isi_max).max(-1.0);
            neuron.stability += neuron.stability_change_parameter * dopamine_value * bounded as f32;
        }
    }
}

/// Redistribute accumulated free resource across each neuron's own outgoing
/// synapses and recompute their weights, for every neuron whose ISI period
/// has ended and whose free resource has crossed its threshold (§4.5.4)
pub fn renormalize_resource(
    projection: &mut Projection<StdpResourceSynapseParams>,
    neurons: &mut [SynapticResourceStdpNeuronParams],
    step: u64,
) {
    let by_presynaptic = projection.by_presynaptic().clone();
    for (source_index, neuron) in neurons.iter_mut().enumerate() {
        let source_index = source_index as u32;

        let gap = step.saturating_sub(neuron.last_isi_spike_step);
        let still_in_period = gap <= neuron.isi_max as u64 && neuron.isi_status != IsiStatus::IsForced;
        if still_in_period {
            continue;
        }
        if neuron.free_synaptic_resource.abs() < neuron.synaptic_resource_threshold {
            continue;
        }
        let Some(synapse_slots) = by_presynaptic.get(&source_index) else {
            continue;
        };
        if synapse_slots.is_empty() {
            continue;
        }

        let share = neuron.free_synaptic_resource
            / (synapse_slots.len() as f32 + neuron.resource_drain_coefficient as f32);
        for &slot in synapse_slots {
            if let Some(synapse) = projection.synapse_mut(slot as usize) {
                synapse.params.synaptic_resource += share;
                synapse.params.recalculate_weight();
            }
        }
        neuron.free_synaptic_resource = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snn_core::synapse_params::{DeltaSynapseParams, OutputType};
    use snn_core::neuron_params::BlifatParams;
    use snn_core::Uid;

    fn neurons(count: usize) -> Vec<SynapticResourceStdpNeuronParams> {
        (0..count)
            .map(|_| {
                SynapticResourceStdpNeuronParams::new(BlifatParams::new(
                    0.9, 0.9, 0.2, 0.9, -0.1, 3, 0.0, -1.0,
                ))
            })
            .collect()
    }

    fn projection() -> Projection<StdpResourceSynapseParams> {
        Projection::new(
            Uid::fresh(),
            Uid::fresh(),
            true,
            vec![(0, 0), (0, 1)],
            |_, _| {
                StdpResourceSynapseParams::new(
                    DeltaSynapseParams::new(0.0, 1, OutputType::Excitatory),
                    1.0,
                    0.0,
                    1.0,
                    0.2,
                    100,
                )
            },
        )
    }

    #[test]
    fn update_isi_starts_then_continues_within_window() {
        let mut neuron = neurons(1).remove(0);
        neuron.isi_max = 10;
        update_isi(&mut neuron, 0, false);
        assert_eq!(neuron.isi_status, IsiStatus::PeriodStarted);
        update_isi(&mut neuron, 5, false);
        assert_eq!(neuron.isi_status, IsiStatus::PeriodContinued);
    }

    #[test]
    fn update_isi_ends_period_after_long_gap() {
        let mut neuron = neurons(1).remove(0);
        neuron.isi_max = 10;
        update_isi(&mut neuron, 0, false);
        update_isi(&mut neuron, 5, false);
        assert_eq!(neuron.isi_status, IsiStatus::PeriodContinued);
        update_isi(&mut neuron, 100, false);
        assert_eq!(neuron.isi_status, IsiStatus::NotInPeriod);
    }

    #[test]
    fn forced_spike_marks_is_forced() {
        let mut neuron = neurons(1).remove(0);
        update_isi(&mut neuron, 0, true);
        assert_eq!(neuron.isi_status, IsiStatus::IsForced);
    }

    #[test]
    fn presynaptic_spike_drains_resource_and_applies_hebbian_once() {
        let mut proj = projection();
        let mut ns = neurons(1);
        ns[0].d_h = 0.1;
        ns[0].isi_max = 10;

        process_spiking_neurons(&mut proj, &mut ns, &[0], 0);
        for synapse in proj.iter() {
            // drained 0.2, then Hebbian +0.1 since this is a fresh ISI period
            assert!((synapse.params.synaptic_resource - 0.9).abs() < 1e-6);
            assert!(synapse.params.had_hebbian_update);
        }

        // same ISI period continuing: drains again but Hebbian is skipped
        process_spiking_neurons(&mut proj, &mut ns, &[0], 1);
        for synapse in proj.iter() {
            assert!((synapse.params.synaptic_resource - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn forced_spike_skips_drain_and_hebbian() {
        let mut proj = projection();
        let mut ns = neurons(1);
        ns[0].is_being_forced = true;

        process_spiking_neurons(&mut proj, &mut ns, &[0], 0);
        for synapse in proj.iter() {
            assert_eq!(synapse.params.synaptic_resource, 1.0);
        }
    }

    #[test]
    fn dopamine_affects_only_recently_spiked_synapses() {
        let mut proj = projection();
        let mut ns = neurons(1);
        for synapse in proj.synapses_mut() {
            synapse.params.last_spike_step = 0;
        }
        do_dopamine_plasticity(&mut proj, &mut ns, 1.0, 1000);
        for synapse in proj.iter() {
            assert_eq!(synapse.params.synaptic_resource, 1.0);
        }
    }

    #[test]
    fn dopamine_reward_increases_resource_and_stability() {
        let mut proj = projection();
        let mut ns = neurons(1);
        ns[0].stability = 0.0;
        ns[0].stability_change_parameter = 1.0;
        ns[0].isi_max = 10;
        ns[0].first_isi_spike = 0;
        for synapse in proj.synapses_mut() {
            synapse.params.last_spike_step = 0;
        }
        do_dopamine_plasticity(&mut proj, &mut ns, 1.0, 5);
        for synapse in proj.iter() {
            assert!(synapse.params.synaptic_resource > 1.0);
        }
        assert!(ns[0].stability > 0.0);
    }

    #[test]
    fn renormalize_skips_neuron_still_within_isi_period() {
        let mut proj = projection();
        let mut ns = neurons(1);
        ns[0].free_synaptic_resource = 5.0;
        ns[0].synaptic_resource_threshold = 0.0;
        ns[0].isi_max = 10;
        ns[0].last_isi_spike_step = 0;

        renormalize_resource(&mut proj, &mut ns, 5);
        assert_eq!(ns[0].free_synaptic_resource, 5.0);
    }

    #[test]
    fn renormalize_redistributes_once_out_of_period_and_over_threshold() {
        let mut proj = projection();
        let mut ns = neurons(1);
        ns[0].free_synaptic_resource = 4.0;
        ns[0].synaptic_resource_threshold = 1.0;
        ns[0].resource_drain_coefficient = 2;
        ns[0].isi_max = 10;
        ns[0].last_isi_spike_step = 0;

        renormalize_resource(&mut proj, &mut ns, 100);
        // 4.0 / (2 synapses + drain coefficient 2) = 1.0 added to each
        for synapse in proj.iter() {
            assert!((synapse.params.synaptic_resource - 2.0).abs() < 1e-6);
        }
        assert_eq!(ns[0].free_synaptic_resource, 0.0);
    }
}
