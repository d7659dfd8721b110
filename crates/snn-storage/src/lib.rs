//! Persistence formats for SNN simulator networks and spike traces
//!
//! Two independent formats live here: [`network_format`] for a network's
//! topology and parameters (a JSON manifest plus a bincode blob), and
//! [`spike_trace`] for the per-population record of which neuron spiked
//! when. Both are plain data formats; nothing in this crate touches a
//! running simulation.

#![warn(missing_docs)]

pub mod contract;
pub mod error;
pub mod network_format;
pub mod spike_trace;

pub use error::{Result, StorageError};
pub use network_format::{NetworkManifest, PopulationSummary, ProjectionSummary};
pub use spike_trace::SpikeTrace;

/// Version of the crate, written into every manifest
pub const STORAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
