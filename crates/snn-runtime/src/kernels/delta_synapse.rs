//! Delta-synapse projection stepping: scheduling and delayed delivery of
//! synaptic impacts (§4.5.2)

use snn_core::{Projection, SynapticImpact};
use snn_core::synapse_params::{DeltaSynapseParams, HasDeltaBase};
use std::collections::BTreeMap;

/// Impacts scheduled for future delivery, keyed by the step they are due.
/// A synapse's delay of `d >= 1` steps means an impact produced by a spike
/// sent at step `t` is queued here under key `t + d - 1` (§4.5.2); a delay
/// of 1 is the minimum representable gap and lands in the very next step's
/// population phase, since this step's projection phase has already run by
/// the time the impact is scheduled.
#[derive(Debug, Clone, Default)]
pub struct FutureMessages {
    by_step: BTreeMap<u64, Vec<SynapticImpact>>,
}

impl FutureMessages {
    /// An empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `impact` for delivery at `step`
    pub fn schedule(&mut self, step: u64, impact: SynapticImpact) {
        self.by_step.entry(step).or_default().push(impact);
    }

    /// Remove and return every impact due at `step`, if any
    pub fn take_due(&mut self, step: u64) -> Option<Vec<SynapticImpact>> {
        self.by_step.remove(&step)
    }

    /// `true` if nothing is scheduled at all (used by the property tests
    /// checking that a projection with no pending input settles)
    pub fn is_empty(&self) -> bool {
        self.by_step.is_empty()
    }

    /// Furthest step with anything scheduled, if any
    pub fn horizon(&self) -> Option<u64> {
        self.by_step.keys().next_back().copied()
    }
}

/// For every presynaptic neuron index in `spiked_indexes`, schedule an
/// impact for each of its outgoing synapses at `current_step + delay - 1`.
/// Generic over any synapse kind carrying a [`DeltaSynapseParams`] base, so
/// the same scheduling logic serves plain delta synapses and both STDP
/// variants (§4.5.2).
pub fn schedule_spikes<S: HasDeltaBase>(
    projection: &mut Projection<S>,
    spiked_indexes: &[u32],
    current_step: u64,
    future: &mut FutureMessages,
) {
    let by_presynaptic = projection.by_presynaptic().clone();
    for &source_index in spiked_indexes {
        let Some(synapse_slots) = by_presynaptic.get(&source_index) else {
            continue;
        };
        for &slot in synapse_slots {
            let Some(synapse) = projection.synapse(slot as usize) else {
                continue;
            };
            let base = synapse.params.delta_base();
            let delivery_step = current_step + base.delay as u64 - 1;
            future.schedule(
                delivery_step,
                SynapticImpact {
                    synapse_index: slot,
                    impact_value: base.weight,
                    synapse_type: base.output_type,
                    presynaptic_neuron_index: synapse.source_index,
                    postsynaptic_neuron_index: synapse.target_index,
                },
            );
        }
    }
}
