//! BLIFAT neuron step kernel (§4.5.1)
//!
//! Each step runs three phases in order: decay of the membrane and its
//! adaptive terms, integration of this step's synaptic input, and finally
//! the shunting-inhibition/fire decision. The phases are kept as free
//! functions rather than methods on [`BlifatParams`] so the synaptic-resource
//! STDP wrapper in [`crate::kernels::stdp_resource`] can interleave its own
//! bookkeeping between input integration and the spike decision.

use snn_core::BlifatParams;

/// This step's accumulated synaptic input for one neuron, gathered from
/// every [`snn_core::SynapticImpactMessage`] addressed to it (§4.5.1)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuronInput {
    /// Sum of `Excitatory` impacts
    pub excitatory: f32,
    /// Sum of `InhibitoryCurrent` impacts
    pub inhibitory_current: f32,
    /// Sum of `InhibitoryConductance` impacts
    pub inhibitory_conductance: f32,
    /// `true` if any `Blocking` impact without `is_forcing` landed this step
    pub blocked: bool,
}

/// Decay the membrane potential and the adaptive threshold/trace/conductance
/// terms, and run down the post-spike bursting countdown. Run once per
/// neuron per step, before input integration.
pub fn decay(neuron: &mut BlifatParams) {
    neuron.n_time_steps_since_last_firing = neuron.n_time_steps_since_last_firing.saturating_add(1);
    neuron.dynamic_threshold *= neuron.threshold_decay;
    neuron.postsynaptic_trace *= neuron.postsynaptic_trace_decay;
    neuron.inhibitory_conductance *= neuron.inhibitory_conductance_decay;
    neuron.potential *= neuron.potential_decay;

    if neuron.bursting_phase > 0 {
        neuron.bursting_phase -= 1;
        if neuron.bursting_phase == 0 {
            neuron.potential += neuron.reflexive_weight;
        }
    }
}

/// Integrate this step's synaptic input and background current into the
/// membrane potential and inhibitory conductance
pub fn integrate_input(neuron: &mut BlifatParams, input: &NeuronInput) {
    neuron.is_blocked = input.blocked;
    if neuron.is_blocked {
        return;
    }
    neuron.potential += neuron.background_current;
    neuron.potential += input.excitatory;
    neuron.potential -= input.inhibitory_current;
    neuron.inhibitory_conductance += input.inhibitory_conductance;
}

/// Decide whether the neuron fires this step, given the state left by
/// [`decay`] and [`integrate_input`]. Applies shunting inhibition first, then
/// the refractory/threshold check. Returns `true` if it spiked.
pub fn post_input(neuron: &mut BlifatParams) -> bool {
    if neuron.is_blocked {
        neuron.potential = neuron.potential.max(neuron.min_potential);
        return false;
    }

    if neuron.inhibitory_conductance < 1.0 {
        neuron.potential -=
            (neuron.potential - neuron.reversal_inhibitory_potential) * neuron.inhibitory_conductance;
    } else {
        neuron.potential = neuron.reversal_inhibitory_potential;
    }

    if neuron.is_refractory() || neuron.potential < 1.0 + neuron.dynamic_threshold {
        neuron.potential = neuron.potential.max(neuron.min_potential);
        return false;
    }

    neuron.potential = neuron.potential_reset_value;
    neuron.dynamic_threshold += neuron.threshold_increment;
    neuron.n_time_steps_since_last_firing = 0;
    neuron.bursting_phase = neuron.bursting_period;
    neuron.postsynaptic_trace += neuron.postsynaptic_trace_increment;
    neuron.total_spikes += 1;

    true
}

/// Run all three phases for one neuron, returning `true` if it spiked
pub fn step(neuron: &mut BlifatParams, input: &NeuronInput) -> bool {
    decay(neuron);
    integrate_input(neuron, input);
    post_input(neuron)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron() -> BlifatParams {
        BlifatParams::new(0.9, 0.9, 0.2, 0.9, -0.1, 3, 0.0, -1.0)
    }

    #[test]
    fn subthreshold_input_does_not_fire() {
        let mut n = neuron();
        let input = NeuronInput {
            excitatory: 0.3,
            ..Default::default()
        };
        assert!(!step(&mut n, &input));
        assert!(n.potential > 0.0 && n.potential < n.effective_threshold());
    }

    #[test]
    fn suprathreshold_input_fires_and_resets() {
        let mut n = neuron();
        let input = NeuronInput {
            excitatory: 2.0,
            ..Default::default()
        };
        assert!(step(&mut n, &input));
        assert_eq!(n.potential, n.potential_reset_value);
        assert_eq!(n.total_spikes, 1);
        assert!(n.is_refractory());
    }

    #[test]
    fn refractory_neuron_does_not_fire_even_with_input() {
        let mut n = neuron();
        n.n_time_steps_since_last_firing = 0;
        let input = NeuronInput {
            excitatory: 10.0,
            ..Default::default()
        };
        assert!(!step(&mut n, &input));
    }

    #[test]
    fn blocked_neuron_ignores_input_entirely() {
        let mut n = neuron();
        let input = NeuronInput {
            excitatory: 10.0,
            blocked: true,
            ..Default::default()
        };
        assert!(!step(&mut n, &input));
        assert_eq!(n.potential, 0.0);
    }

    #[test]
    fn potential_decays_toward_zero_without_input() {
        let mut n = neuron();
        n.potential = 1.0;
        step(&mut n, &NeuronInput::default());
        assert!((n.potential - 0.9).abs() < 1e-6);
    }

    #[test]
    fn threshold_increases_after_a_spike_and_decays_back() {
        let mut n = neuron();
        let fire_input = NeuronInput {
            excitatory: 5.0,
            ..Default::default()
        };
        step(&mut n, &fire_input);
        let elevated = n.effective_threshold();
        assert!(elevated > 1.0);
        for _ in 0..50 {
            step(&mut n, &NeuronInput::default());
        }
        assert!((n.effective_threshold() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn shunting_inhibition_clamps_to_reversal_once_conductance_saturates() {
        let mut n = neuron();
        n.potential = 5.0;
        n.inhibitory_conductance = 1.5;
        integrate_input(&mut n, &NeuronInput::default());
        assert!(!post_input(&mut n));
        assert_eq!(n.potential, n.reversal_inhibitory_potential);
    }

    #[test]
    fn bursting_phase_counts_down_and_adds_reflexive_weight_on_expiry() {
        let mut n = neuron();
        n.bursting_period = 2;
        n.reflexive_weight = 0.1;
        let fire_input = NeuronInput {
            excitatory: 5.0,
            ..Default::default()
        };
        assert!(step(&mut n, &fire_input));
        assert_eq!(n.bursting_phase, 2);

        step(&mut n, &NeuronInput::default());
        assert_eq!(n.bursting_phase, 1);

        let potential_before_expiry = n.potential;
        step(&mut n, &NeuronInput::default());
        assert_eq!(n.bursting_phase, 0);
        assert!(
            (n.potential - (potential_before_expiry * n.potential_decay + n.reflexive_weight)).abs() < 1e-4
        );
    }

    #[test]
    fn postsynaptic_trace_decays_and_increments_on_spike() {
        let mut n = neuron();
        n.postsynaptic_trace_decay = 0.5;
        n.postsynaptic_trace_increment = 1.0;
        n.postsynaptic_trace = 0.8;
        let fire_input = NeuronInput {
            excitatory: 5.0,
            ..Default::default()
        };
        assert!(step(&mut n, &fire_input));
        assert!((n.postsynaptic_trace - 1.4).abs() < 1e-6);
    }
}
