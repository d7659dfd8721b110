//! Synapse groups connecting two populations (§3.8, §4.4)

use crate::error::{CoreError, Result};
use crate::tags::BaseData;
use crate::uid::Uid;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One synapse within a projection: its parameters plus the neuron indexes
/// it connects (§3.8)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Synapse<S> {
    /// Synapse-kind-specific parameters
    pub params: S,
    /// Index of the presynaptic neuron within the projection's source
    /// population
    pub source_index: u32,
    /// Index of the postsynaptic neuron within the projection's target
    /// population
    pub target_index: u32,
}

impl<S> Synapse<S> {
    /// Construct a synapse
    pub fn new(params: S, source_index: u32, target_index: u32) -> Self {
        Self {
            params,
            source_index,
            target_index,
        }
    }
}

/// Which side of a synapse an index lookup should be built over (§4.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// Group synapses by `source_index`
    ByPresynaptic,
    /// Group synapses by `target_index`
    ByPostsynaptic,
}

/// How a projection treats inbound spike messages from a population it
/// tracks for STDP timing but does not necessarily forward as ordinary
/// synaptic input (§3.8, §4.5.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StdpPopulationMode {
    /// Messages from this sender only append to each affected synapse's
    /// `postsynaptic_spike_times` queue; they are never forwarded to the
    /// delta-synapse step.
    StdpOnly,
    /// Messages from this sender both append to the postsynaptic queue
    /// and are forwarded to the delta-synapse step as ordinary input.
    StdpAndSpike,
}

/// An ordered group of synapses of a single kind `S`, connecting one
/// presynaptic population to one postsynaptic population
///
/// The by-presynaptic and by-postsynaptic indexes are rebuilt lazily: any
/// mutation through [`Self::synapses_mut`] or [`Self::add_synapses`]
/// invalidates both, and the next [`Self::by_presynaptic`] or
/// [`Self::by_postsynaptic`] call rebuilds the one it needs (§4.4).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Projection<S> {
    /// Identity and tags
    pub base: BaseData,
    /// UID of the presynaptic population
    pub presynaptic_uid: Uid,
    /// UID of the postsynaptic population
    pub postsynaptic_uid: Uid,
    /// `true` if the weights of this projection's synapses may be modified
    /// by a plasticity rule. Locked projections (`false`) are skipped
    /// entirely during the plasticity phase (§4.5.3, §4.5.4).
    pub is_plastic: bool,
    /// Populations (beyond the implicit, always-forwarded `presynaptic_uid`)
    /// whose spikes this projection tracks for STDP timing, and how (§3.8,
    /// §4.5.3). Empty for projections that don't partition inbound spikes
    /// this way.
    pub stdp_populations: HashMap<Uid, StdpPopulationMode>,
    synapses: Vec<Synapse<S>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    presynaptic_index: Option<HashMap<u32, Vec<u32>>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    postsynaptic_index: Option<HashMap<u32, Vec<u32>>>,
}

impl<S> Projection<S> {
    /// Construct a projection between two populations from a generator
    /// callback invoked once per candidate `(source_index, target_index)`
    /// pair; `pairs` enumerates the pairs to connect (§4.4, connector
    /// library builds `pairs`)
    pub fn new(
        presynaptic_uid: Uid,
        postsynaptic_uid: Uid,
        is_plastic: bool,
        pairs: impl IntoIterator<Item = (u32, u32)>,
        mut generator: impl FnMut(u32, u32) -> S,
    ) -> Self {
        let synapses = pairs
            .into_iter()
            .map(|(src, tgt)| Synapse::new(generator(src, tgt), src, tgt))
            .collect();
        Self {
            base: BaseData::new(),
            presynaptic_uid,
            postsynaptic_uid,
            is_plastic,
            stdp_populations: HashMap::new(),
            synapses,
            presynaptic_index: None,
            postsynaptic_index: None,
        }
    }

    /// Mode this projection tracks `sender` under, if any (§4.5.3)
    pub fn stdp_population_mode(&self, sender: Uid) -> Option<StdpPopulationMode> {
        self.stdp_populations.get(&sender).copied()
    }

    /// Start tracking `population` under `mode` for STDP timing
    pub fn set_stdp_population(&mut self, population: Uid, mode: StdpPopulationMode) {
        self.stdp_populations.insert(population, mode);
    }

    /// UID of this projection
    pub fn uid(&self) -> Uid {
        self.base.uid
    }

    /// Number of synapses
    pub fn size(&self) -> usize {
        self.synapses.len()
    }

    /// Read a synapse by its index within the projection
    pub fn synapse(&self, index: usize) -> Option<&Synapse<S>> {
        self.synapses.get(index)
    }

    /// Mutably access a single synapse by index without invalidating the
    /// cached indexes (the synapse's `source_index`/`target_index` are
    /// immutable through this accessor; only callers mutating topology via
    /// [`Self::add_synapses`]/[`Self::remove_synapse`] invalidate them)
    pub fn synapse_mut(&mut self, index: usize) -> Option<&mut Synapse<S>> {
        self.synapses.get_mut(index)
    }

    /// Mutably iterate over all synapses, invalidating both indexes
    pub fn synapses_mut(&mut self) -> impl Iterator<Item = &mut Synapse<S>> {
        self.presynaptic_index = None;
        self.postsynaptic_index = None;
        self.synapses.iter_mut()
    }

    /// Iterate over all synapses in index order
    pub fn iter(&self) -> impl Iterator<Item = &Synapse<S>> {
        self.synapses.iter()
    }

    /// Append synapses, invalidating both indexes
    pub fn add_synapses(&mut self, synapses: impl IntoIterator<Item = Synapse<S>>) {
        self.synapses.extend(synapses);
        self.presynaptic_index = None;
        self.postsynaptic_index = None;
    }

    /// Remove a synapse by index, invalidating both indexes
    pub fn remove_synapse(&mut self, index: usize) -> Result<Synapse<S>> {
        if index >= self.synapses.len() {
            return Err(CoreError::invalid_topology(
                self.uid(),
                format!("synapse index {index} out of range"),
            ));
        }
        self.presynaptic_index = None;
        self.postsynaptic_index = None;
        Ok(self.synapses.remove(index))
    }

    /// Synapse indexes grouped by presynaptic neuron index, building the
    /// index on first use after invalidation
    pub fn by_presynaptic(&mut self) -> &HashMap<u32, Vec<u32>> {
        if self.presynaptic_index.is_none() {
            self.presynaptic_index = Some(self.build_index(Search::ByPresynaptic));
        }
        self.presynaptic_index.as_ref().unwrap()
    }

    /// Synapse indexes grouped by postsynaptic neuron index, building the
    /// index on first use after invalidation
    pub fn by_postsynaptic(&mut self) -> &HashMap<u32, Vec<u32>> {
        if self.postsynaptic_index.is_none() {
            self.postsynaptic_index = Some(self.build_index(Search::ByPostsynaptic));
        }
        self.postsynaptic_index.as_ref().unwrap()
    }

    fn build_index(&self, by: Search) -> HashMap<u32, Vec<u32>> {
        let mut index: HashMap<u32, Vec<u32>> = HashMap::new();
        for (i, synapse) in self.synapses.iter().enumerate() {
            let key = match by {
                Search::ByPresynaptic => synapse.source_index,
                Search::ByPostsynaptic => synapse.target_index,
            };
            index.entry(key).or_default().push(i as u32);
        }
        index
    }
}

impl<S: crate::synapse_params::HasDeltaBase> Projection<S> {
    /// Dump every synapse's current weight for checkpointing, keyed by
    /// `(source_index, target_index)` (§10.6)
    pub fn snapshot_weights(&self) -> Vec<(u32, u32, f32)> {
        self.synapses
            .iter()
            .map(|synapse| {
                (
                    synapse.source_index,
                    synapse.target_index,
                    synapse.params.delta_base().weight,
                )
            })
            .collect()
    }

    /// Restore weights from a previous [`Self::snapshot_weights`] dump,
    /// matching each update to the first synapse with that
    /// `(source_index, target_index)` pair. Updates naming a pair absent
    /// from this projection are skipped; returns the count actually
    /// applied (§10.6).
    pub fn apply_weight_updates(&mut self, updates: &[(u32, u32, f32)]) -> usize {
        let mut applied = 0;
        for &(source_index, target_index, weight) in updates {
            if let Some(synapse) = self
                .synapses
                .iter_mut()
                .find(|s| s.source_index == source_index && s.target_index == target_index)
            {
                synapse.params.delta_base_mut().weight = weight;
                applied += 1;
            }
        }
        applied
    }
}
