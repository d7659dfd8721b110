//! The flat container of populations and projections making up one network
//! (§3.9, §4.4)
//!
//! Concrete neuron and synapse kinds are closed (§9): a [`Network`] stores
//! populations and projections behind the [`PopulationVariant`] and
//! [`ProjectionVariant`] sum types rather than behind a trait object, so a
//! backend can match exhaustively and dispatch to the right kernel without
//! dynamic dispatch overhead.

use crate::error::{CoreError, Result};
use crate::neuron_params::{BlifatParams, SynapticResourceStdpNeuronParams};
use crate::population::Population;
use crate::projection::Projection;
use crate::synapse_params::{DeltaSynapseParams, StdpAdditiveSynapseParams, StdpResourceSynapseParams};
use crate::tags::BaseData;
use crate::uid::Uid;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A population of one of the supported neuron kinds
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PopulationVariant {
    /// Plain BLIFAT neurons, no plasticity bookkeeping at the neuron level
    Blifat(Population<BlifatParams>),
    /// BLIFAT neurons extended with synaptic-resource STDP bookkeeping
    SynapticResourceStdpBlifat(Population<SynapticResourceStdpNeuronParams>),
}

impl PopulationVariant {
    /// UID of the wrapped population
    pub fn uid(&self) -> Uid {
        match self {
            Self::Blifat(p) => p.uid(),
            Self::SynapticResourceStdpBlifat(p) => p.uid(),
        }
    }

    /// Number of neurons in the wrapped population
    pub fn size(&self) -> usize {
        match self {
            Self::Blifat(p) => p.size(),
            Self::SynapticResourceStdpBlifat(p) => p.size(),
        }
    }

    /// Kind name, used for [`CoreError::TypeMismatch`] messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Blifat(_) => "Blifat",
            Self::SynapticResourceStdpBlifat(_) => "SynapticResourceStdpBlifat",
        }
    }
}

/// A projection of one of the supported synapse kinds
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProjectionVariant {
    /// Delta synapses with no plasticity
    DeltaSynapse(Projection<DeltaSynapseParams>),
    /// Delta synapses under additive STDP
    StdpAdditive(Projection<StdpAdditiveSynapseParams>),
    /// Delta synapses under synaptic-resource STDP
    StdpResource(Projection<StdpResourceSynapseParams>),
}

impl ProjectionVariant {
    /// UID of the wrapped projection
    pub fn uid(&self) -> Uid {
        match self {
            Self::DeltaSynapse(p) => p.uid(),
            Self::StdpAdditive(p) => p.uid(),
            Self::StdpResource(p) => p.uid(),
        }
    }

    /// UID of the presynaptic population
    pub fn presynaptic_uid(&self) -> Uid {
        match self {
            Self::DeltaSynapse(p) => p.presynaptic_uid,
            Self::StdpAdditive(p) => p.presynaptic_uid,
            Self::StdpResource(p) => p.presynaptic_uid,
        }
    }

    /// UID of the postsynaptic population
    pub fn postsynaptic_uid(&self) -> Uid {
        match self {
            Self::DeltaSynapse(p) => p.postsynaptic_uid,
            Self::StdpAdditive(p) => p.postsynaptic_uid,
            Self::StdpResource(p) => p.postsynaptic_uid,
        }
    }

    /// Every population UID this projection additionally tracks for STDP
    /// timing, beyond its implicit `presynaptic_uid` (§4.5.3)
    pub fn stdp_populations(&self) -> Vec<Uid> {
        match self {
            Self::DeltaSynapse(p) => p.stdp_populations.keys().copied().collect(),
            Self::StdpAdditive(p) => p.stdp_populations.keys().copied().collect(),
            Self::StdpResource(p) => p.stdp_populations.keys().copied().collect(),
        }
    }

    /// Mode this projection tracks `sender` under, if any (§4.5.3)
    pub fn stdp_population_mode(&self, sender: Uid) -> Option<crate::projection::StdpPopulationMode> {
        match self {
            Self::DeltaSynapse(p) => p.stdp_population_mode(sender),
            Self::StdpAdditive(p) => p.stdp_population_mode(sender),
            Self::StdpResource(p) => p.stdp_population_mode(sender),
        }
    }

    /// `true` if this projection's weights may be modified during the
    /// plasticity phase
    pub fn is_plastic(&self) -> bool {
        match self {
            Self::DeltaSynapse(p) => p.is_plastic,
            Self::StdpAdditive(p) => p.is_plastic,
            Self::StdpResource(p) => p.is_plastic,
        }
    }

    /// Kind name, used for [`CoreError::TypeMismatch`] messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::DeltaSynapse(_) => "DeltaSynapse",
            Self::StdpAdditive(_) => "StdpAdditive",
            Self::StdpResource(_) => "StdpResource",
        }
    }

    /// Dump every synapse's current weight, regardless of kind (§10.6)
    pub fn snapshot_weights(&self) -> Vec<(u32, u32, f32)> {
        match self {
            Self::DeltaSynapse(p) => p.snapshot_weights(),
            Self::StdpAdditive(p) => p.snapshot_weights(),
            Self::StdpResource(p) => p.snapshot_weights(),
        }
    }

    /// Restore weights from a previous [`Self::snapshot_weights`] dump;
    /// returns the count actually applied (§10.6)
    pub fn apply_weight_updates(&mut self, updates: &[(u32, u32, f32)]) -> usize {
        match self {
            Self::DeltaSynapse(p) => p.apply_weight_updates(updates),
            Self::StdpAdditive(p) => p.apply_weight_updates(updates),
            Self::StdpResource(p) => p.apply_weight_updates(updates),
        }
    }
}

/// A full network: a flat, unordered collection of populations and
/// projections addressed by UID (§3.9)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Network {
    /// Identity and tags for the network itself
    pub base: BaseData,
    populations: HashMap<Uid, PopulationVariant>,
    projections: HashMap<Uid, ProjectionVariant>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// An empty network with a fresh UID
    pub fn new() -> Self {
        Self {
            base: BaseData::new(),
            populations: HashMap::new(),
            projections: HashMap::new(),
        }
    }

    /// UID of the network
    pub fn uid(&self) -> Uid {
        self.base.uid
    }

    /// Add a population, keyed by its own UID
    pub fn add_population(&mut self, population: PopulationVariant) -> Uid {
        let uid = population.uid();
        self.populations.insert(uid, population);
        uid
    }

    /// Add a projection, keyed by its own UID. Errors if either endpoint
    /// population is not already part of the network (§4.4).
    pub fn add_projection(&mut self, projection: ProjectionVariant) -> Result<Uid> {
        let uid = projection.uid();
        if !self.populations.contains_key(&projection.presynaptic_uid()) {
            return Err(CoreError::invalid_topology(
                projection.presynaptic_uid(),
                "presynaptic population not found in network",
            ));
        }
        if !self.populations.contains_key(&projection.postsynaptic_uid()) {
            return Err(CoreError::invalid_topology(
                projection.postsynaptic_uid(),
                "postsynaptic population not found in network",
            ));
        }
        self.projections.insert(uid, projection);
        Ok(uid)
    }

    /// Look up a population by UID
    pub fn population(&self, uid: Uid) -> Option<&PopulationVariant> {
        self.populations.get(&uid)
    }

    /// Mutably look up a population by UID
    pub fn population_mut(&mut self, uid: Uid) -> Option<&mut PopulationVariant> {
        self.populations.get_mut(&uid)
    }

    /// Look up a projection by UID
    pub fn projection(&self, uid: Uid) -> Option<&ProjectionVariant> {
        self.projections.get(&uid)
    }

    /// Mutably look up a projection by UID
    pub fn projection_mut(&mut self, uid: Uid) -> Option<&mut ProjectionVariant> {
        self.projections.get_mut(&uid)
    }

    /// Remove a population and every projection whose presynaptic or
    /// postsynaptic endpoint was that population (§9: dangling-endpoint
    /// prevention is the network's responsibility, not the caller's)
    pub fn remove_population(&mut self, uid: Uid) -> Result<PopulationVariant> {
        let removed = self
            .populations
            .remove(&uid)
            .ok_or_else(|| CoreError::invalid_topology(uid, "population not found"))?;
        self.projections
            .retain(|_, proj| proj.presynaptic_uid() != uid && proj.postsynaptic_uid() != uid);
        Ok(removed)
    }

    /// Remove a projection
    pub fn remove_projection(&mut self, uid: Uid) -> Result<ProjectionVariant> {
        self.projections
            .remove(&uid)
            .ok_or_else(|| CoreError::invalid_topology(uid, "projection not found"))
    }

    /// Iterate over all populations
    pub fn populations(&self) -> impl Iterator<Item = (&Uid, &PopulationVariant)> {
        self.populations.iter()
    }

    /// Mutably iterate over all populations
    pub fn populations_mut(&mut self) -> impl Iterator<Item = (&Uid, &mut PopulationVariant)> {
        self.populations.iter_mut()
    }

    /// Iterate over all projections
    pub fn projections(&self) -> impl Iterator<Item = (&Uid, &ProjectionVariant)> {
        self.projections.iter()
    }

    /// Mutably iterate over all projections
    pub fn projections_mut(&mut self) -> impl Iterator<Item = (&Uid, &mut ProjectionVariant)> {
        self.projections.iter_mut()
    }

    /// Mutably borrow a projection and a population at the same time. The
    /// two live in disjoint maps, so this is the escape hatch backends need
    /// to run a plasticity kernel that touches both a projection's synapses
    /// and its presynaptic population's neurons in one call (§4.6.3)
    pub fn projection_and_population_mut(
        &mut self,
        projection_uid: Uid,
        population_uid: Uid,
    ) -> (Option<&mut ProjectionVariant>, Option<&mut PopulationVariant>) {
        (
            self.projections.get_mut(&projection_uid),
            self.populations.get_mut(&population_uid),
        )
    }

    /// Number of populations
    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    /// Number of projections
    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Synapse;
    use crate::synapse_params::OutputType;

    fn blifat_population(count: usize) -> PopulationVariant {
        PopulationVariant::Blifat(Population::new(count, |_| {
            BlifatParams::new(0.9, 0.9, 0.1, 0.9, -0.1, 3, 0.0, -1.0)
        }))
    }

    #[test]
    fn add_and_fetch_population() {
        let mut net = Network::new();
        let uid = net.add_population(blifat_population(3));
        assert_eq!(net.population(uid).unwrap().size(), 3);
        assert_eq!(net.population_count(), 1);
    }

    #[test]
    fn add_projection_requires_existing_endpoints() {
        let mut net = Network::new();
        let proj = ProjectionVariant::DeltaSynapse(Projection::new(
            Uid::fresh(),
            Uid::fresh(),
            false,
            vec![],
            |_, _| DeltaSynapseParams::new(1.0, 1, OutputType::Excitatory),
        ));
        assert!(net.add_projection(proj).is_err());
    }

    #[test]
    fn add_projection_succeeds_with_known_endpoints() {
        let mut net = Network::new();
        let pre_uid = net.add_population(blifat_population(2));
        let post_uid = net.add_population(blifat_population(2));
        let proj = ProjectionVariant::DeltaSynapse(Projection::new(
            pre_uid,
            post_uid,
            false,
            vec![(0, 0)],
            |_, _| DeltaSynapseParams::new(0.5, 1, OutputType::Excitatory),
        ));
        let uid = net.add_projection(proj).unwrap();
        assert_eq!(net.projection(uid).unwrap().kind_name(), "DeltaSynapse");
    }

    #[test]
    fn remove_population_cascades_to_dependent_projections() {
        let mut net = Network::new();
        let pre_uid = net.add_population(blifat_population(2));
        let post_uid = net.add_population(blifat_population(2));
        let proj = ProjectionVariant::DeltaSynapse(Projection::new(
            pre_uid,
            post_uid,
            false,
            vec![(0, 0)],
            |_, _| DeltaSynapseParams::new(0.5, 1, OutputType::Excitatory),
        ));
        net.add_projection(proj).unwrap();
        net.remove_population(pre_uid).unwrap();
        assert_eq!(net.projection_count(), 0);
    }

    #[test]
    fn remove_unknown_projection_errors() {
        let mut net = Network::new();
        assert!(net.remove_projection(Uid::fresh()).is_err());
    }

    #[test]
    fn synapse_construction_compiles_for_each_variant() {
        let s: Synapse<DeltaSynapseParams> =
            Synapse::new(DeltaSynapseParams::new(1.0, 1, OutputType::Excitatory), 0, 0);
        assert_eq!(s.source_index, 0);
    }
}
