use crate::types::{Pair, StackResult};
use serde::{Deserialize, Serialize};

/// Job-matrix document consumed by the batch execution system. The JSON
/// shape is `{"include": [{"reference", "secondary", "name"}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatrix {
    pub include: Vec<Pair>,
}

/// Serializes selected pairs into the job-matrix contract
pub struct JobMatrixEmitter;

impl JobMatrixEmitter {
    /// Wrap an ordered pair sequence in the matrix structure
    pub fn emit(pairs: Vec<Pair>) -> JobMatrix {
        log::info!("Number of interferograms: {}", pairs.len());
        JobMatrix { include: pairs }
    }

    /// Matrix document as a JSON string
    pub fn to_json(matrix: &JobMatrix) -> StackResult<String> {
        Ok(serde_json::to_string(matrix)?)
    }

    /// Parse a matrix document back into its pair sequence
    pub fn from_json(json: &str) -> StackResult<JobMatrix> {
        Ok(serde_json::from_str(json)?)
    }
}
