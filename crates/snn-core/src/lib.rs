//! Network model, identity, and message types for the SNN simulator
//!
//! This crate owns the parts of the simulator that have no notion of time
//! stepping or threading: entity identity ([`uid`]), orchestration metadata
//! ([`tags`]), per-neuron and per-synapse parameter records
//! ([`neuron_params`], [`synapse_params`]), the [`population::Population`]
//! and [`projection::Projection`] containers, the flat [`network::Network`]
//! they live in, a [`connectors`] library for building projection topology,
//! and the [`message`] types exchanged over the fabric. Stepping the
//! network forward lives in `snn-runtime`; routing messages between
//! entities lives in `snn-fabric`.

#![warn(missing_docs)]

pub mod connectors;
pub mod error;
pub mod message;
pub mod network;
pub mod neuron_params;
pub mod population;
pub mod projection;
pub mod synapse_params;
pub mod tags;
pub mod uid;

pub use error::{CoreError, Result};
pub use message::{MessageKind, SpikeMessage, SynapticImpact, SynapticImpactMessage};
pub use network::{Network, PopulationVariant, ProjectionVariant};
pub use neuron_params::{BlifatParams, IsiStatus, SynapticResourceStdpNeuronParams};
pub use population::Population;
pub use projection::{Projection, Search, StdpPopulationMode, Synapse};
pub use synapse_params::{
    DeltaSynapseParams, OutputType, StdpAdditiveSynapseParams, StdpResourceSynapseParams,
};
pub use tags::{BaseData, TagMap, TagValue};
pub use uid::Uid;

/// Version of the crate, exposed for diagnostics and storage manifests
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
