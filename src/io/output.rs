use crate::core::matrix::{JobMatrix, JobMatrixEmitter};
use crate::types::StackResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append the two planning outputs as `KEY=value` lines, the format the
/// workflow's output channel consumes. The file is appended to, never
/// truncated, since earlier steps may already have written outputs.
pub fn write_job_outputs<P: AsRef<Path>>(
    path: P,
    scene_names: &[String],
    matrix: &JobMatrix,
) -> StackResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    writeln!(file, "BURST_IDS={}", serde_json::to_string(scene_names)?)?;
    writeln!(
        file,
        "MATRIX_PARAMS_COMBINATIONS={}",
        JobMatrixEmitter::to_json(matrix)?
    )?;

    log::info!(
        "Wrote {} scene ids and {} jobs to {}",
        scene_names.len(),
        matrix.include.len(),
        path.as_ref().display()
    );
    Ok(())
}
