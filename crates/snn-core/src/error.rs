//! Error types for the network model

use crate::uid::Uid;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the identity, message, and network-model layers
#[derive(Error, Debug)]
pub enum CoreError {
    /// Add/remove/get referenced a population or projection UID the network
    /// does not own, or a synapse referenced a neuron index out of range
    #[error("invalid topology: {reason} (entity {entity})")]
    InvalidTopology {
        /// Human-readable reason
        reason: String,
        /// UID of the entity involved
        entity: Uid,
    },

    /// A synapse delay was less than 1, or a population size changed
    /// mid-step
    #[error("invariant violation: {reason} (entity {entity}, step {step})")]
    InvariantViolation {
        /// Human-readable reason
        reason: String,
        /// UID of the entity involved
        entity: Uid,
        /// Step index at which the violation was observed
        step: u64,
    },

    /// Backend or loader was asked to handle a neuron/synapse kind it does
    /// not support
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected kind name
        expected: String,
        /// Actual kind name encountered
        found: String,
    },
}

impl CoreError {
    /// Build an [`CoreError::InvalidTopology`]
    pub fn invalid_topology(entity: Uid, reason: impl Into<String>) -> Self {
        Self::InvalidTopology {
            reason: reason.into(),
            entity,
        }
    }

    /// Build an [`CoreError::InvariantViolation`]
    pub fn invariant_violation(entity: Uid, step: u64, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
            entity,
            step,
        }
    }

    /// Build a [`CoreError::TypeMismatch`]
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
