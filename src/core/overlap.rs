use crate::types::{Acquisition, OverlapRecord, StackError, StackResult};
use geo::{Area, BooleanOps};
use geo_types::Polygon;
use rayon::prelude::*;

/// Fractional overlap between a candidate footprint and the reference
/// footprint: intersection area divided by the reference area.
///
/// Returns 0.0 for disjoint polygons. The denominator is always the
/// reference, so swapping the arguments changes the result unless both
/// areas are equal. A zero-area reference is rejected because the
/// fraction is undefined for it.
pub fn overlap_fraction(candidate: &Polygon<f64>, reference: &Polygon<f64>) -> StackResult<f64> {
    let reference_area = reference.unsigned_area();
    if reference_area <= 0.0 {
        return Err(StackError::Geometry(
            "Reference footprint has zero area".to_string(),
        ));
    }

    let intersection = candidate.intersection(reference);
    let fraction = intersection.unsigned_area() / reference_area;

    // Guard against round-off just past the unit interval
    Ok(fraction.clamp(0.0, 1.0))
}

/// Compute overlap fractions for every candidate against the reference
/// footprint. Candidates are independent, so the map runs in parallel;
/// input order is preserved.
pub fn compute_overlaps(
    acquisitions: Vec<Acquisition>,
    reference: &Polygon<f64>,
) -> StackResult<Vec<OverlapRecord>> {
    // Fail fast on a degenerate reference instead of once per worker
    if reference.unsigned_area() <= 0.0 {
        return Err(StackError::Geometry(
            "Reference footprint has zero area".to_string(),
        ));
    }

    acquisitions
        .into_par_iter()
        .map(|acquisition| {
            let fraction = overlap_fraction(&acquisition.footprint, reference)?;
            log::debug!(
                "Overlap {:.3} for {}",
                fraction,
                acquisition.scene_name
            );
            Ok(OverlapRecord {
                acquisition,
                fraction,
            })
        })
        .collect()
}

/// Retain acquisitions whose footprint covers at least `threshold` of the
/// reference footprint. The threshold is caller-supplied; see
/// `io::config` for the values used by the surrounding workflow.
pub fn filter_by_overlap(
    acquisitions: Vec<Acquisition>,
    reference: &Polygon<f64>,
    threshold: f64,
) -> StackResult<Vec<Acquisition>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(StackError::Configuration(format!(
            "Overlap threshold must be within [0, 1], got {}",
            threshold
        )));
    }

    let total = acquisitions.len();
    let survivors: Vec<Acquisition> = compute_overlaps(acquisitions, reference)?
        .into_iter()
        .filter(|record| record.fraction >= threshold)
        .map(|record| record.acquisition)
        .collect();

    log::info!(
        "Overlap filter (>= {:.2}): {} of {} acquisitions retained",
        threshold,
        survivors.len(),
        total
    );

    Ok(survivors)
}
