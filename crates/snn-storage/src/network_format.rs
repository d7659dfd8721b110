//! Network manifest and binary blob persistence (§6)
//!
//! A saved network is a directory: [`crate::contract::NETWORK_CONFIG_FILE`]
//! holds a human-readable JSON manifest summarizing what is inside (useful
//! for tooling that never wants to touch the binary blob), and
//! [`crate::contract::NETWORK_DATA_FILE`] holds the full
//! [`snn_core::Network`] bincode-encoded for exact reload.

use crate::contract::type_id;
use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use snn_core::{Network, PopulationVariant, ProjectionVariant, Uid};
use std::io::{Read, Write};

/// Summary of one population, enough for tooling to list a network's
/// contents without decoding the binary blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    /// UID of the population
    pub uid: Uid,
    /// Type identifier from [`crate::contract::type_id`]
    pub type_id: u32,
    /// Number of neurons
    pub size: usize,
}

/// Summary of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// UID of the projection
    pub uid: Uid,
    /// Type identifier from [`crate::contract::type_id`]
    pub type_id: u32,
    /// UID of the presynaptic population
    pub presynaptic_uid: Uid,
    /// UID of the postsynaptic population
    pub postsynaptic_uid: Uid,
    /// Number of synapses
    pub size: usize,
    /// `true` if the projection's weights may change under plasticity
    pub is_plastic: bool,
    /// Every synapse's `(source_index, target_index, weight)`, redundant
    /// with the binary blob but readable without decoding it (§10.6)
    pub weights: Vec<(u32, u32, f32)>,
}

/// The `network_config.json` manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkManifest {
    /// UID of the network itself
    pub network_uid: Uid,
    /// `snn-core` crate version the network was produced by
    pub core_version: String,
    /// One summary per population, in no particular order
    pub populations: Vec<PopulationSummary>,
    /// One summary per projection, in no particular order
    pub projections: Vec<ProjectionSummary>,
}

fn population_type_id(variant: &PopulationVariant) -> u32 {
    match variant {
        PopulationVariant::Blifat(_) => type_id::BLIFAT,
        PopulationVariant::SynapticResourceStdpBlifat(_) => {
            type_id::SYNAPTIC_RESOURCE_STDP_BLIFAT
        }
    }
}

fn projection_type_id(variant: &ProjectionVariant) -> u32 {
    match variant {
        ProjectionVariant::DeltaSynapse(_) => type_id::DELTA_SYNAPSE,
        ProjectionVariant::StdpAdditive(_) => type_id::STDP_ADDITIVE_DELTA_SYNAPSE,
        ProjectionVariant::StdpResource(_) => type_id::SYNAPTIC_RESOURCE_STDP_DELTA_SYNAPSE,
    }
}

impl NetworkManifest {
    /// Summarize `network` into a manifest
    pub fn from_network(network: &Network) -> Self {
        let populations = network
            .populations()
            .map(|(uid, variant)| PopulationSummary {
                uid: *uid,
                type_id: population_type_id(variant),
                size: variant.size(),
            })
            .collect();
        let projections = network
            .projections()
            .map(|(uid, variant)| ProjectionSummary {
                uid: *uid,
                type_id: projection_type_id(variant),
                presynaptic_uid: variant.presynaptic_uid(),
                postsynaptic_uid: variant.postsynaptic_uid(),
                size: match variant {
                    ProjectionVariant::DeltaSynapse(p) => p.size(),
                    ProjectionVariant::StdpAdditive(p) => p.size(),
                    ProjectionVariant::StdpResource(p) => p.size(),
                },
                is_plastic: variant.is_plastic(),
                weights: variant.snapshot_weights(),
            })
            .collect();
        Self {
            network_uid: network.uid(),
            core_version: snn_core::CORE_VERSION.to_string(),
            populations,
            projections,
        }
    }

    /// Re-apply this manifest's weight snapshots onto `network`, matching
    /// projections by UID. Projections named in the manifest but absent
    /// from `network` are skipped; used to restore weights onto a network
    /// reconstructed some other way than [`decode_network`] (§10.6).
    pub fn apply_weights(&self, network: &mut Network) {
        for summary in &self.projections {
            if let Some(variant) = network.projection_mut(summary.uid) {
                variant.apply_weight_updates(&summary.weights);
            }
        }
    }

    /// Write the manifest as pretty JSON
    pub fn write_json(&self, writer: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a manifest from JSON
    pub fn read_json(reader: &mut impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Encode a full network to its binary representation
pub fn encode_network(network: &Network) -> Result<Vec<u8>> {
    bincode::serialize(network).map_err(StorageError::from)
}

/// Decode a full network previously produced by [`encode_network`]
pub fn decode_network(bytes: &[u8]) -> Result<Network> {
    bincode::deserialize(bytes).map_err(StorageError::from)
}
