//! Core pairing modules

pub mod matrix;
pub mod overlap;
pub mod pairing;
pub mod plan;
pub mod stack;

// Re-export main types
pub use matrix::{JobMatrix, JobMatrixEmitter};
pub use overlap::{compute_overlaps, filter_by_overlap, overlap_fraction};
pub use pairing::{PairSelector, PairingOutcome, PairingStrategy};
pub use plan::{plan_jobs, JobPlan, PlanConfig};
pub use stack::AcquisitionStack;
