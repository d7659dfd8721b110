//! Error types for the message fabric

use thiserror::Error;

/// Result type for fabric operations
pub type Result<T> = std::result::Result<T, FabricError>;

/// Errors raised by the message bus and its endpoints
#[derive(Error, Debug)]
pub enum FabricError {
    /// The bus backing an endpoint has already been dropped. Endpoints hold
    /// only a weak reference to the bus so that a bus can be torn down
    /// without forcing every endpoint to be dropped first; this is returned
    /// if an endpoint outlives its bus.
    #[error("bus disconnected")]
    BusDisconnected,

    /// A subscription or send referenced a message type the receiver never
    /// registered for
    #[error("no subscription for this message type on receiver {receiver}")]
    NoSubscription {
        /// Receiver UID that lacked the subscription
        receiver: String,
    },
}
