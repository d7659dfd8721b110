//! JSON spike-trace format: a flat record of which neuron spiked at which
//! step, for one population (§6)

use crate::contract::{SPIKE_TRACE_MAGIC, SPIKE_TRACE_VERSION};
use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use snn_core::Uid;
use std::io::{Read, Write};

/// Unit the `timestamps` column is expressed in. Always `"step"`; kept as
/// an explicit field so a future trace format using wall-clock time can be
/// distinguished without a version bump.
const TIMESTAMP_UNIT: &str = "step";

/// A single population's recorded spikes, sorted by timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeTrace {
    magic: u32,
    version: [u8; 2],
    sorting: String,
    /// UID of the population this trace was recorded from
    pub population_uid: Uid,
    /// Unit timestamps are expressed in, always `"step"`
    pub unit: String,
    /// Neuron index for each recorded spike, parallel to `timestamps`
    pub node_ids: Vec<u32>,
    /// Step at which each recorded spike occurred, parallel to `node_ids`
    pub timestamps: Vec<u64>,
}

impl SpikeTrace {
    /// An empty trace for `population_uid`
    pub fn new(population_uid: Uid) -> Self {
        Self {
            magic: SPIKE_TRACE_MAGIC,
            version: SPIKE_TRACE_VERSION,
            sorting: "by_timestamps".to_string(),
            population_uid,
            unit: TIMESTAMP_UNIT.to_string(),
            node_ids: Vec::new(),
            timestamps: Vec::new(),
        }
    }

    /// Append one recorded spike, keeping `by_timestamps` sorting true as
    /// long as callers append in non-decreasing step order (the common
    /// case, since spikes are recorded as the simulation advances)
    pub fn push(&mut self, neuron_index: u32, step: u64) {
        self.node_ids.push(neuron_index);
        self.timestamps.push(step);
    }

    /// Number of recorded spikes
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// `true` if no spikes were recorded
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Validate the header fields, rejecting a trace from an incompatible
    /// format version or with mismatched column lengths
    pub fn validate(&self) -> Result<()> {
        if self.magic != SPIKE_TRACE_MAGIC {
            return Err(StorageError::format_error(format!(
                "unexpected magic {:#x}",
                self.magic
            )));
        }
        if self.version != SPIKE_TRACE_VERSION {
            return Err(StorageError::format_error(format!(
                "unsupported version {:?}",
                self.version
            )));
        }
        if self.node_ids.len() != self.timestamps.len() {
            return Err(StorageError::format_error(
                "node_ids and timestamps length mismatch",
            ));
        }
        Ok(())
    }

    /// Serialize to pretty JSON and write to `writer`
    pub fn write_json(&self, writer: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read and validate a trace from `reader`
    pub fn read_json(reader: &mut impl Read) -> Result<Self> {
        let trace: Self = serde_json::from_reader(reader)?;
        trace.validate()?;
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trace_has_expected_header() {
        let trace = SpikeTrace::new(Uid::fresh());
        assert_eq!(trace.magic, SPIKE_TRACE_MAGIC);
        assert_eq!(trace.unit, "step");
        assert!(trace.is_empty());
    }

    #[test]
    fn json_round_trip_preserves_spikes() {
        let mut trace = SpikeTrace::new(Uid::fresh());
        trace.push(3, 10);
        trace.push(7, 12);

        let mut buf = Vec::new();
        trace.write_json(&mut buf).unwrap();
        let read_back = SpikeTrace::read_json(&mut buf.as_slice()).unwrap();
        assert_eq!(read_back, trace);
    }

    #[test]
    fn validate_rejects_bad_magic() {
        let mut trace = SpikeTrace::new(Uid::fresh());
        trace.magic = 0;
        assert!(trace.validate().is_err());
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let mut trace = SpikeTrace::new(Uid::fresh());
        trace.node_ids.push(1);
        assert!(trace.validate().is_err());
    }
}
