//! Per-synapse parameter records (§3.4–§3.6)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a synapse's impact value affects the postsynaptic neuron (§4.5.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputType {
    /// `potential += impact_value`
    Excitatory,
    /// `potential -= impact_value`
    InhibitoryCurrent,
    /// `inhibitory_conductance += impact_value`
    InhibitoryConductance,
    /// Routed to plasticity only; no potential change
    Dopamine,
    /// Sets the postsynaptic neuron's blocking gate
    Blocking,
}

/// Parameters of a single delta synapse (§3.4)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeltaSynapseParams {
    /// Synaptic weight
    pub weight: f32,
    /// Delivery delay in steps; must be `>= 1`
    pub delay: u32,
    /// How the delivered impact affects the target neuron
    pub output_type: OutputType,
}

impl DeltaSynapseParams {
    /// Construct delta synapse parameters
    pub fn new(weight: f32, delay: u32, output_type: OutputType) -> Self {
        Self {
            weight,
            delay,
            output_type,
        }
    }
}

/// Synapse kinds that carry a [`DeltaSynapseParams`] base, letting delivery
/// scheduling work the same way across a plain delta synapse and either
/// STDP variant (§4.5.2)
pub trait HasDeltaBase {
    /// Borrow the underlying delta-synapse parameters
    fn delta_base(&self) -> &DeltaSynapseParams;

    /// Mutably borrow the underlying delta-synapse parameters. Used to
    /// overwrite `weight` directly (e.g. restoring a snapshot); resource-STDP
    /// synapses that do so should expect their next plasticity update to
    /// recompute `weight` from `synaptic_resource` again (§4.5.4 step 3).
    fn delta_base_mut(&mut self) -> &mut DeltaSynapseParams;
}

impl HasDeltaBase for DeltaSynapseParams {
    fn delta_base(&self) -> &DeltaSynapseParams {
        self
    }

    fn delta_base_mut(&mut self) -> &mut DeltaSynapseParams {
        self
    }
}

/// Additive-STDP synapse: a delta synapse plus per-synapse timing queues
/// (§3.5). The rule state is appended after the base synapse layout, flat
/// composition with no virtual dispatch, per §9.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StdpAdditiveSynapseParams {
    /// Base delta-synapse parameters
    pub base: DeltaSynapseParams,
    /// Potentiation time constant
    pub tau_plus: f32,
    /// Depression time constant
    pub tau_minus: f32,
    /// Presynaptic spike step history, bounded by `tau_plus + tau_minus`
    pub presynaptic_spike_times: Vec<u64>,
    /// Postsynaptic spike step history, bounded by `tau_plus + tau_minus`
    pub postsynaptic_spike_times: Vec<u64>,
}

impl StdpAdditiveSynapseParams {
    /// Construct additive-STDP synapse parameters with empty queues
    pub fn new(base: DeltaSynapseParams, tau_plus: f32, tau_minus: f32) -> Self {
        Self {
            base,
            tau_plus,
            tau_minus,
            presynaptic_spike_times: Vec::new(),
            postsynaptic_spike_times: Vec::new(),
        }
    }

    /// The bound on queue length that triggers a weight update (§4.5.3)
    pub fn update_threshold(&self) -> f32 {
        self.tau_plus + self.tau_minus
    }

    /// `true` once both queues together are long enough to trigger an
    /// update, per the §10.7 relaxation of the original symmetric-length
    /// requirement
    pub fn ready_for_update(&self) -> bool {
        let total = self.presynaptic_spike_times.len() + self.postsynaptic_spike_times.len();
        (total as f32) >= self.update_threshold()
    }
}

impl HasDeltaBase for StdpAdditiveSynapseParams {
    fn delta_base(&self) -> &DeltaSynapseParams {
        &self.base
    }

    fn delta_base_mut(&mut self) -> &mut DeltaSynapseParams {
        &mut self.base
    }
}

/// Synaptic-resource STDP synapse: a delta synapse plus resource-pool state
/// (§3.6)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StdpResourceSynapseParams {
    /// Base delta-synapse parameters. `weight` is recomputed from
    /// `synaptic_resource` every update (§4.5.4 step 3) rather than being
    /// driven directly.
    pub base: DeltaSynapseParams,
    /// Current synaptic resource
    pub synaptic_resource: f32,
    /// Minimum weight bound
    pub w_min: f32,
    /// Maximum weight bound
    pub w_max: f32,
    /// Resource drained into the presynaptic neuron's free pool per spike
    pub d_u: f32,
    /// Step of the last presynaptic spike this synapse was updated for
    pub last_spike_step: u64,
    /// Window (in steps) during which a dopamine signal still affects this
    /// synapse after its last spike
    pub dopamine_plasticity_period: u64,
    /// Whether a Hebbian update already happened in the current ISI period
    pub had_hebbian_update: bool,
}

impl StdpResourceSynapseParams {
    /// Construct synaptic-resource STDP synapse parameters
    pub fn new(
        base: DeltaSynapseParams,
        synaptic_resource: f32,
        w_min: f32,
        w_max: f32,
        d_u: f32,
        dopamine_plasticity_period: u64,
    ) -> Self {
        Self {
            base,
            synaptic_resource,
            w_min,
            w_max,
            d_u,
            last_spike_step: 0,
            dopamine_plasticity_period,
            had_hebbian_update: false,
        }
    }

    /// Recompute `base.weight` from the current resource, per §4.5.4 step 3
    pub fn recalculate_weight(&mut self) {
        let r = self.synaptic_resource.max(0.0);
        let span = self.w_max - self.w_min;
        self.base.weight = self.w_min + span * r / (span + r);
    }
}

impl HasDeltaBase for StdpResourceSynapseParams {
    fn delta_base(&self) -> &DeltaSynapseParams {
        &self.base
    }

    fn delta_base_mut(&mut self) -> &mut DeltaSynapseParams {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_ready_for_update_counts_both_queues() {
        let mut syn = StdpAdditiveSynapseParams::new(
            DeltaSynapseParams::new(0.5, 1, OutputType::Excitatory),
            10.0,
            10.0,
        );
        assert!(!syn.ready_for_update());
        syn.presynaptic_spike_times = vec![0; 12];
        syn.postsynaptic_spike_times = vec![0; 8];
        assert!(syn.ready_for_update());
    }

    #[test]
    fn resource_recalculate_matches_s5() {
        // §8 S5: w_min=0, w_max=1, resource starts at 1, d_u=0; drive one
        // Hebbian update bringing resource to 2 -> weight = 2/3.
        let mut syn = StdpResourceSynapseParams::new(
            DeltaSynapseParams::new(0.0, 1, OutputType::Excitatory),
            2.0,
            0.0,
            1.0,
            0.0,
            100,
        );
        syn.recalculate_weight();
        assert!((syn.base.weight - 0.6667).abs() < 1e-3);
    }

    #[test]
    fn resource_weight_clamped_to_w_min_when_resource_non_positive() {
        let mut syn = StdpResourceSynapseParams::new(
            DeltaSynapseParams::new(0.0, 1, OutputType::Excitatory),
            -5.0,
            0.2,
            1.0,
            0.0,
            100,
        );
        syn.recalculate_weight();
        assert_eq!(syn.base.weight, 0.2);
    }
}
