//! Additive STDP kernel (§4.5.3)
//!
//! Each synapse keeps a bounded history of its own presynaptic and
//! postsynaptic spike steps. Once the two queues together hold at least
//! `tau_plus + tau_minus` entries, every presynaptic/postsynaptic pair
//! contributes one exponential term to a single batched weight update, and
//! both queues are cleared — the §10.7 relaxation of the original's strict
//! queue-length symmetry requirement.

use snn_core::synapse_params::StdpAdditiveSynapseParams;

fn potentiation(dt: f32, tau_plus: f32) -> f32 {
    (-dt / tau_plus).exp()
}

fn depression(dt: f32, tau_minus: f32) -> f32 {
    -(-dt / tau_minus).exp()
}

fn pair_contribution(delta_t: f32, tau_plus: f32, tau_minus: f32) -> f32 {
    if delta_t > 0.0 {
        potentiation(delta_t, tau_plus)
    } else {
        depression(-delta_t, tau_minus)
    }
}

/// Run the batched update once `synapse.ready_for_update()`, then clear both
/// queues. `apply` gates only whether the computed `Δw` is written to the
/// weight; the queues are drained either way so a weight-locked projection
/// doesn't grow them unbounded.
fn maybe_update(synapse: &mut StdpAdditiveSynapseParams, apply: bool) {
    if !synapse.ready_for_update() {
        return;
    }

    let mut delta_w = 0.0;
    for &t_f in &synapse.presynaptic_spike_times {
        for &t_n in &synapse.postsynaptic_spike_times {
            let delta_t = t_n as f32 - t_f as f32;
            delta_w += pair_contribution(delta_t, synapse.tau_plus, synapse.tau_minus);
        }
    }

    if apply {
        synapse.base.weight += delta_w;
    }
    synapse.presynaptic_spike_times.clear();
    synapse.postsynaptic_spike_times.clear();
}

/// Record a presynaptic spike at `step`; triggers the batched update once
/// the combined queue length crosses `tau_plus + tau_minus` (§4.5.3)
pub fn on_presynaptic_spike(synapse: &mut StdpAdditiveSynapseParams, step: u64, apply: bool) {
    synapse.presynaptic_spike_times.push(step);
    maybe_update(synapse, apply);
}

/// Record a postsynaptic spike at `step`; triggers the batched update once
/// the combined queue length crosses `tau_plus + tau_minus` (§4.5.3)
pub fn on_postsynaptic_spike(synapse: &mut StdpAdditiveSynapseParams, step: u64, apply: bool) {
    synapse.postsynaptic_spike_times.push(step);
    maybe_update(synapse, apply);
}
