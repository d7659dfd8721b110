//! The simulation backend: shared control plane plus two interchangeable
//! schedulers (§4.6)

mod contract;
pub(crate) mod single_threaded;
pub(crate) mod worker_pool;

pub use contract::Backend;
