//! Backend configuration (§10.4)

use crate::error::RuntimeError;

/// Which scheduler a [`crate::backend::Backend`] runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// Step every population and projection on the calling thread
    SingleThreaded,
    /// Step populations and projections across a `rayon` thread pool,
    /// observably identical to [`SchedulerKind::SingleThreaded`] (§4.6.4)
    WorkerPool,
}

/// Tunables for constructing a backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Which scheduler to build
    pub scheduler: SchedulerKind,
    /// Thread count for [`SchedulerKind::WorkerPool`]; ignored otherwise.
    /// `0` means "let rayon pick based on available parallelism".
    pub thread_count: usize,
    /// Populations smaller than this are never split across threads even
    /// under the worker pool, since the overhead would dominate
    pub neurons_per_thread: usize,
    /// Projections with fewer pending spikes than this step on a single
    /// thread regardless of scheduler
    pub spikes_per_thread: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerKind::SingleThreaded,
            thread_count: 0,
            neurons_per_thread: 256,
            spikes_per_thread: 256,
        }
    }
}

impl BackendConfig {
    /// Check the configuration is internally consistent
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.neurons_per_thread == 0 {
            return Err(RuntimeError::invalid_config(
                "neurons_per_thread must be at least 1",
            ));
        }
        if self.spikes_per_thread == 0 {
            return Err(RuntimeError::invalid_config(
                "spikes_per_thread must be at least 1",
            ));
        }
        Ok(())
    }
}
