//! I/O modules for catalog ingestion, workflow configuration, and the
//! key/value output channel

pub mod catalog;
pub mod config;
pub mod output;

pub use catalog::{parse_reference_footprint, parse_search_results};
pub use config::{FullBurstId, WorkflowInputs, CONTAINMENT_THRESHOLD, PAIRING_THRESHOLD};
pub use output::write_job_outputs;
