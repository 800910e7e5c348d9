//! burstpair: Sentinel-1 acquisition stack pairing for InSAR job matrices
//!
//! This library filters catalog search results against a target ground
//! footprint, orders the surviving acquisitions chronologically, and selects
//! reference/secondary pairs for batch interferometric processing, either as
//! a dense short-interval network or as fixed multi-year offset pairs.

pub mod types;
pub mod io;
pub mod core;

// Re-export main types and functions for easier access
pub use types::{
    Acquisition, OverlapRecord, Pair, Platform, Polarization, StackError, StackResult,
    StackWarning,
};

pub use crate::core::{
    filter_by_overlap, overlap_fraction, plan_jobs, AcquisitionStack, JobMatrix,
    JobMatrixEmitter, JobPlan, PairSelector, PairingOutcome, PairingStrategy, PlanConfig,
};

pub use io::{
    parse_reference_footprint, parse_search_results, write_job_outputs, FullBurstId,
    WorkflowInputs, CONTAINMENT_THRESHOLD, PAIRING_THRESHOLD,
};
