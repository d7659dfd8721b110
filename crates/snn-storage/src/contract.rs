//! On-disk layout and type identifiers shared by every persisted network
//! (§6)

/// Relative path of a network's topology manifest within its save directory
pub const NETWORK_CONFIG_FILE: &str = "network_config.json";

/// Relative path of the binary synapse/neuron parameter blob
pub const NETWORK_DATA_FILE: &str = "network.bin";

/// Relative directory holding per-population spike traces
pub const SPIKE_TRACE_DIR: &str = "spikes";

/// Numeric type identifiers written into a network manifest so a loader
/// can dispatch to the right concrete kind without string matching
pub mod type_id {
    /// [`snn_core::PopulationVariant::Blifat`]
    pub const BLIFAT: u32 = 1000;
    /// [`snn_core::PopulationVariant::SynapticResourceStdpBlifat`]
    pub const SYNAPTIC_RESOURCE_STDP_BLIFAT: u32 = 1100;
    /// [`snn_core::ProjectionVariant::DeltaSynapse`]
    pub const DELTA_SYNAPSE: u32 = 2000;
    /// [`snn_core::ProjectionVariant::StdpAdditive`]
    pub const STDP_ADDITIVE_DELTA_SYNAPSE: u32 = 2050;
    /// [`snn_core::ProjectionVariant::StdpResource`]
    pub const SYNAPTIC_RESOURCE_STDP_DELTA_SYNAPSE: u32 = 2100;
}

/// Magic number stamped at the start of every spike-trace file
pub const SPIKE_TRACE_MAGIC: u32 = 2682;

/// Format version stamped alongside [`SPIKE_TRACE_MAGIC`]
pub const SPIKE_TRACE_VERSION: [u8; 2] = [0, 1];
