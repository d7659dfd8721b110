//! Simulation kernels and scheduling backends for the SNN simulator
//!
//! This crate turns the data model in `snn-core` and the message fabric in
//! `snn-fabric` into a runnable simulation: [`kernels`] holds the per-step
//! math (BLIFAT integration, delta-synapse delivery, both STDP rules) as
//! free functions, [`config`] holds the tunables for building one, and
//! [`backend`] ties them together behind a single-threaded or `rayon`
//! worker-pool scheduler with identical observable behavior (§4.6).

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod kernels;

pub use backend::Backend;
pub use config::{BackendConfig, SchedulerKind};
pub use error::{Result, RuntimeError};

/// Version of the crate, exposed for diagnostics and manifests
pub const RUNTIME_VERSION: &str = env!("CARGO_PKG_VERSION");
