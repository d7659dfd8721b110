//! The [`BusMessage`] trait lets the fabric route any message type without
//! knowing its shape, as long as it can report its own sender (§4.3)

use snn_core::Uid;
use std::any::Any;

/// A message that can be carried over the fabric
///
/// Implemented for [`snn_core::SpikeMessage`] and
/// [`snn_core::SynapticImpactMessage`]; downstream crates may implement it
/// for their own message kinds (e.g. a dopamine broadcast) as long as they
/// are `'static + Send`.
pub trait BusMessage: Any + Send {
    /// UID of the entity that produced this message
    fn sender_uid(&self) -> Uid;
}

impl BusMessage for snn_core::SpikeMessage {
    fn sender_uid(&self) -> Uid {
        self.sender_uid
    }
}

impl BusMessage for snn_core::SynapticImpactMessage {
    fn sender_uid(&self) -> Uid {
        self.sender_uid
    }
}
