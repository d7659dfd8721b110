//! Error types for simulation kernels and backends

use snn_core::CoreError;
use snn_fabric::FabricError;
use snn_storage::StorageError;
use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while stepping or configuring a backend
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Propagated from the network model (`snn-core`)
    #[error("network model error: {0}")]
    Core(#[from] CoreError),

    /// Propagated from the message fabric (`snn-fabric`)
    #[error("fabric error: {0}")]
    Fabric(#[from] FabricError),

    /// Propagated from persistence (`snn-storage`)
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A [`crate::config::BackendConfig`] field was out of range
    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),

    /// `start()` was called on a backend that was already running
    #[error("backend is already running")]
    AlreadyRunning,

    /// A step or control operation was attempted after the backend was
    /// asked to stop. Callers that expect this (e.g. a graceful shutdown
    /// race) should match on it and treat it as `Ok(None)` rather than
    /// propagating it further.
    #[error("schedule stopped")]
    ScheduleStopped,
}

impl RuntimeError {
    /// Build a [`RuntimeError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}
