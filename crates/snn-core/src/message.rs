//! Message types carried over the fabric (§4.2)
//!
//! Both message kinds share a header: the sending entity's [`Uid`] and the
//! step at which the message was produced. A binary wire envelope
//! ([`encode`]/[`decode`]) is provided for transports that need to cross a
//! process boundary (§6); in-process delivery never touches it.

use crate::synapse_params::OutputType;
use crate::uid::Uid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A population reporting which of its neurons spiked this step (§4.2.1)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeMessage {
    /// UID of the population that produced this message
    pub sender_uid: Uid,
    /// Step at which the spikes occurred
    pub send_time: u64,
    /// Indexes of neurons that spiked, in emission order. Duplicates are
    /// tolerated and counted, not deduplicated (§4.2.1).
    pub neuron_indexes: Vec<u32>,
}

impl SpikeMessage {
    /// Construct a spike message
    pub fn new(sender_uid: Uid, send_time: u64, neuron_indexes: Vec<u32>) -> Self {
        Self {
            sender_uid,
            send_time,
            neuron_indexes,
        }
    }

    /// `true` if no neuron spiked
    pub fn is_empty(&self) -> bool {
        self.neuron_indexes.is_empty()
    }
}

/// One delivered synaptic impact: which synapse fired, its value, kind, and
/// the neuron indexes on either side (§4.2.2)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynapticImpact {
    /// Index of the synapse within its owning projection
    pub synapse_index: u32,
    /// The delivered impact value (already scaled by synapse weight)
    pub impact_value: f32,
    /// How the receiving neuron should apply the impact
    pub synapse_type: OutputType,
    /// Index of the presynaptic neuron within the source population
    pub presynaptic_neuron_index: u32,
    /// Index of the postsynaptic neuron within the target population
    pub postsynaptic_neuron_index: u32,
}

/// A projection delivering synaptic impacts scheduled for this step
/// (§4.2.2, §4.5.2)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynapticImpactMessage {
    /// UID of the projection that produced this message
    pub sender_uid: Uid,
    /// Step at which the impacts are delivered
    pub send_time: u64,
    /// UID of the projection's presynaptic population
    pub presynaptic_population_uid: Uid,
    /// UID of the projection's postsynaptic population
    pub postsynaptic_population_uid: Uid,
    /// `true` if this delivery should bypass the BLIFAT blocking gate
    /// (§4.5.1)
    pub is_forcing: bool,
    /// The impacts being delivered this step
    pub impacts: Vec<SynapticImpact>,
}

impl SynapticImpactMessage {
    /// Construct a synaptic impact message
    pub fn new(
        sender_uid: Uid,
        send_time: u64,
        presynaptic_population_uid: Uid,
        postsynaptic_population_uid: Uid,
        is_forcing: bool,
        impacts: Vec<SynapticImpact>,
    ) -> Self {
        Self {
            sender_uid,
            send_time,
            presynaptic_population_uid,
            postsynaptic_population_uid,
            is_forcing,
            impacts,
        }
    }
}

/// Wire-level tag distinguishing the two message kinds, used only by the
/// binary envelope (§6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    /// Tag for [`SpikeMessage`]
    Spike = 1,
    /// Tag for [`SynapticImpactMessage`]
    SynapticImpact = 2,
}

/// Encode a [`SpikeMessage`] as a little-endian binary envelope: 1-byte
/// kind tag, 16-byte sender UID, 8-byte send time, 4-byte neuron count, then
/// the neuron indexes.
pub fn encode_spike(msg: &SpikeMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 16 + 8 + 4 + msg.neuron_indexes.len() * 4);
    buf.push(MessageKind::Spike as u8);
    buf.extend_from_slice(&msg.sender_uid.to_be_bytes());
    buf.extend_from_slice(&msg.send_time.to_le_bytes());
    buf.extend_from_slice(&(msg.neuron_indexes.len() as u32).to_le_bytes());
    for idx in &msg.neuron_indexes {
        buf.extend_from_slice(&idx.to_le_bytes());
    }
    buf
}

/// Decode a [`SpikeMessage`] previously produced by [`encode_spike`]
pub fn decode_spike(bytes: &[u8]) -> Option<SpikeMessage> {
    if bytes.len() < 1 + 16 + 8 + 4 || bytes[0] != MessageKind::Spike as u8 {
        return None;
    }
    let sender_uid = Uid::from_be_bytes(bytes[1..17].try_into().ok()?);
    let send_time = u64::from_le_bytes(bytes[17..25].try_into().ok()?);
    let count = u32::from_le_bytes(bytes[25..29].try_into().ok()?) as usize;
    let expected_len = 29 + count * 4;
    if bytes.len() != expected_len {
        return None;
    }
    let mut neuron_indexes = Vec::with_capacity(count);
    for chunk in bytes[29..expected_len].chunks_exact(4) {
        neuron_indexes.push(u32::from_le_bytes(chunk.try_into().ok()?));
    }
    Some(SpikeMessage {
        sender_uid,
        send_time,
        neuron_indexes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spike_message_empty() {
        let msg = SpikeMessage::new(Uid::fresh(), 5, vec![]);
        assert!(msg.is_empty());
    }

    #[test]
    fn spike_message_tolerates_duplicate_indexes() {
        let msg = SpikeMessage::new(Uid::fresh(), 5, vec![3, 3, 7]);
        assert_eq!(msg.neuron_indexes, vec![3, 3, 7]);
    }

    #[test]
    fn spike_wire_round_trip() {
        let msg = SpikeMessage::new(Uid::fresh(), 42, vec![1, 2, 3, 100]);
        let bytes = encode_spike(&msg);
        let decoded = decode_spike(&bytes).expect("valid envelope");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn spike_wire_rejects_truncated_envelope() {
        let msg = SpikeMessage::new(Uid::fresh(), 42, vec![1, 2, 3]);
        let mut bytes = encode_spike(&msg);
        bytes.truncate(bytes.len() - 1);
        assert_eq!(decode_spike(&bytes), None);
    }

    #[test]
    fn spike_wire_rejects_wrong_kind_tag() {
        let msg = SpikeMessage::new(Uid::fresh(), 42, vec![1]);
        let mut bytes = encode_spike(&msg);
        bytes[0] = MessageKind::SynapticImpact as u8;
        assert_eq!(decode_spike(&bytes), None);
    }

    #[test]
    fn synaptic_impact_message_construction() {
        let impact = SynapticImpact {
            synapse_index: 0,
            impact_value: 0.75,
            synapse_type: OutputType::Excitatory,
            presynaptic_neuron_index: 2,
            postsynaptic_neuron_index: 9,
        };
        let msg = SynapticImpactMessage::new(
            Uid::fresh(),
            10,
            Uid::fresh(),
            Uid::fresh(),
            false,
            vec![impact],
        );
        assert_eq!(msg.impacts.len(), 1);
        assert!(!msg.is_forcing);
    }
}
