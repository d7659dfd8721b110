//! Per-neuron parameter records (§3.2–§3.3)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// State and parameters of a single BLIFAT neuron (§3.2, §4.5.1)
///
/// Fields mix true parameters (set once, e.g. `threshold_decay`) with mutable
/// state (updated every step, e.g. `potential`) in one flat record, matching
/// how the original keeps both in a single struct rather than splitting
/// "params" from "state". A neuron fires once `potential >= 1.0 +
/// dynamic_threshold`; the `1.0` baseline is a fixed constant in the
/// original, not a configurable field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlifatParams {
    /// Membrane potential
    pub potential: f32,
    /// Potential decay constant per step, in `(0, 1]`
    pub potential_decay: f32,
    /// Potential to reset to immediately after firing
    pub potential_reset_value: f32,
    /// Minimum potential the membrane may decay to
    pub min_potential: f32,
    /// Activity-dependent addition to the fixed `1.0` firing baseline
    pub dynamic_threshold: f32,
    /// Decay constant for `dynamic_threshold`, in `(0, 1]`
    pub threshold_decay: f32,
    /// How much `dynamic_threshold` increases on each spike
    pub threshold_increment: f32,
    /// Trace left by this neuron's own spikes, used by STDP rules that read
    /// postsynaptic activity off the neuron rather than a synapse queue
    pub postsynaptic_trace: f32,
    /// Decay constant for `postsynaptic_trace`, in `(0, 1]`
    pub postsynaptic_trace_decay: f32,
    /// How much `postsynaptic_trace` increases on each spike
    pub postsynaptic_trace_increment: f32,
    /// Inhibitory conductance accumulator
    pub inhibitory_conductance: f32,
    /// Decay constant for `inhibitory_conductance`, in `(0, 1]`
    pub inhibitory_conductance_decay: f32,
    /// Reversal potential the inhibitory conductance pulls the membrane
    /// toward
    pub reversal_inhibitory_potential: f32,
    /// Steps elapsed since this neuron last fired; `u64::MAX` before its
    /// first spike so the initial refractory check never blocks it
    pub n_time_steps_since_last_firing: u64,
    /// Absolute refractory period, in steps
    pub absolute_refractory_period: u32,
    /// Steps remaining in the post-spike bursting phase; counts down to
    /// zero, at which point `reflexive_weight` is added to `potential`
    pub bursting_phase: u32,
    /// Bursting phase length set on every spike; `0` disables bursting
    pub bursting_period: u32,
    /// Potential added when `bursting_phase` counts down to zero
    pub reflexive_weight: f32,
    /// Total spikes fired since creation
    pub total_spikes: u64,
    /// `true` while the neuron is gated closed by a `Blocking` synapse
    pub is_blocked: bool,
    /// Background current applied every step regardless of synaptic input
    pub background_current: f32,
    /// Index of the population this neuron's own index is drawn from,
    /// retained for diagnostics only
    pub population_index: u32,
}

impl Default for BlifatParams {
    fn default() -> Self {
        Self {
            potential: 0.0,
            potential_decay: 1.0,
            potential_reset_value: 0.0,
            min_potential: -1.0e9,
            dynamic_threshold: 0.0,
            threshold_decay: 1.0,
            threshold_increment: 0.0,
            postsynaptic_trace: 0.0,
            postsynaptic_trace_decay: 1.0,
            postsynaptic_trace_increment: 0.0,
            inhibitory_conductance: 0.0,
            inhibitory_conductance_decay: 1.0,
            reversal_inhibitory_potential: -0.3,
            n_time_steps_since_last_firing: u64::MAX,
            absolute_refractory_period: 0,
            bursting_phase: 0,
            bursting_period: 0,
            reflexive_weight: 0.0,
            total_spikes: 0,
            is_blocked: false,
            background_current: 0.0,
            population_index: 0,
        }
    }
}

impl BlifatParams {
    /// Construct a neuron at rest using the subset of fields every test
    /// scenario in §8 varies; everything else keeps its [`Default`]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        potential_decay: f32,
        threshold_decay: f32,
        threshold_increment: f32,
        inhibitory_conductance_decay: f32,
        reversal_inhibitory_potential: f32,
        absolute_refractory_period: u32,
        potential_reset_value: f32,
        min_potential: f32,
    ) -> Self {
        Self {
            potential_decay,
            threshold_decay,
            threshold_increment,
            inhibitory_conductance_decay,
            reversal_inhibitory_potential,
            absolute_refractory_period,
            potential_reset_value,
            min_potential,
            ..Default::default()
        }
    }

    /// Current firing threshold: the fixed `1.0` baseline plus the
    /// activity-dependent term (§4.5.1)
    pub fn effective_threshold(&self) -> f32 {
        1.0 + self.dynamic_threshold
    }

    /// `true` if the neuron is within its absolute refractory period
    pub fn is_refractory(&self) -> bool {
        self.n_time_steps_since_last_firing <= self.absolute_refractory_period as u64
    }
}

/// ISI bookkeeping state for synaptic-resource STDP, tracked per neuron
/// (§4.5.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IsiStatus {
    /// No inter-spike-interval period is currently open
    NotInPeriod,
    /// A period just started with this spike
    PeriodStarted,
    /// A period that started earlier is still open
    PeriodContinued,
    /// The period was forced closed (e.g. by a forcing synapse) rather than
    /// timing out naturally
    IsForced,
}

/// A BLIFAT neuron extended with the bookkeeping synaptic-resource STDP
/// needs at the neuron (rather than synapse) level (§3.3, §4.5.4)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynapticResourceStdpNeuronParams {
    /// The underlying BLIFAT neuron
    pub blifat: BlifatParams,
    /// Resource freed by presynaptic spikes on this neuron's outgoing
    /// synapses, not yet distributed to those synapses
    pub free_synaptic_resource: f32,
    /// Magnitude `free_synaptic_resource` must reach before it is
    /// redistributed across this neuron's outgoing synapses
    pub synaptic_resource_threshold: f32,
    /// Added to the synapse count when redistributing free resource, so a
    /// neuron with few outgoing synapses doesn't dump all of it at once
    pub resource_drain_coefficient: u32,
    /// Stability metric driving dopamine-induced resource changes
    pub stability: f32,
    /// Scales how much a dopamine signal or Hebbian update moves `stability`
    pub stability_change_parameter: f32,
    /// Subtracted from `stability` every time a new ISI period starts
    pub stability_change_at_isi: f32,
    /// Gap (in steps) beyond which the next spike starts a new ISI period
    /// rather than continuing the current one
    pub isi_max: u32,
    /// Hebbian plasticity amount applied to a synapse's resource once per
    /// ISI period
    pub d_h: f32,
    /// Current ISI state machine status
    pub isi_status: IsiStatus,
    /// Step of the last spike seen for ISI purposes
    pub last_isi_spike_step: u64,
    /// Step the current ISI period began at; used by the dopamine reward
    /// formula
    pub first_isi_spike: u64,
    /// `true` if this neuron fired because of a forcing synaptic signal on
    /// the current step, rather than on its own accumulated potential
    pub is_being_forced: bool,
    /// Dopamine accumulated from `Dopamine`-type impacts this step
    pub dopamine_value: f32,
}

impl SynapticResourceStdpNeuronParams {
    /// Wrap a BLIFAT neuron with resting synaptic-resource STDP state
    pub fn new(blifat: BlifatParams) -> Self {
        Self {
            blifat,
            free_synaptic_resource: 0.0,
            synaptic_resource_threshold: f32::INFINITY,
            resource_drain_coefficient: 0,
            stability: 0.0,
            stability_change_parameter: 0.0,
            stability_change_at_isi: 0.0,
            isi_max: 1,
            d_h: 1.0,
            isi_status: IsiStatus::NotInPeriod,
            last_isi_spike_step: 0,
            first_isi_spike: 0,
            is_being_forced: false,
            dopamine_value: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_threshold_adds_dynamic_contribution() {
        let mut p = BlifatParams::new(0.5, 0.5, 0.2, 0.5, -0.1, 3, 0.0, -1.0);
        assert_eq!(p.effective_threshold(), 1.0);
        p.dynamic_threshold = 0.3;
        assert!((p.effective_threshold() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn refractory_detection() {
        let mut p = BlifatParams::new(0.5, 0.5, 0.2, 0.5, -0.1, 3, 0.0, -1.0);
        assert!(!p.is_refractory());
        p.n_time_steps_since_last_firing = 2;
        assert!(p.is_refractory());
        p.n_time_steps_since_last_firing = 4;
        assert!(!p.is_refractory());
    }

    #[test]
    fn resource_stdp_wrapper_starts_not_in_period() {
        let blifat = BlifatParams::new(0.5, 0.5, 0.2, 0.5, -0.1, 3, 0.0, -1.0);
        let wrapped = SynapticResourceStdpNeuronParams::new(blifat);
        assert_eq!(wrapped.isi_status, IsiStatus::NotInPeriod);
        assert_eq!(wrapped.free_synaptic_resource, 0.0);
        assert_eq!(wrapped.isi_max, 1);
    }
}
