// Hardware inventory collection modules
pub mod error;
pub mod probe;
pub mod types;
pub mod lshw;
pub mod classify;
pub mod collect_cpu;
pub mod collect_memory;
pub mod collect_network;
pub mod collect_storage;
pub mod collect_node;
pub mod collect_bmc;
pub mod strategy;
pub mod collector;

#[cfg(test)]
pub mod test_support;

pub use collector::{Collector, ProbePaths};
pub use error::ProbeError;
pub use probe::SystemProbe;
