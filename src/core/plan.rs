use crate::core::matrix::{JobMatrix, JobMatrixEmitter};
use crate::core::overlap::filter_by_overlap;
use crate::core::pairing::{PairSelector, PairingStrategy};
use crate::core::stack::AcquisitionStack;
use crate::types::{Acquisition, StackResult, StackWarning};
use geo_types::Polygon;

/// Configuration for one planning run. All values are caller-supplied;
/// nothing is read from global state inside the core.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Minimum fractional footprint overlap to retain an acquisition
    pub overlap_threshold: f64,
    pub strategy: PairingStrategy,
}

/// Result of a planning run. Carries the two output-contract values (the
/// surviving scene names and the job matrix) plus enough bookkeeping to
/// report degraded runs: how many acquisitions were considered, how many
/// survived filtering, and every non-fatal condition encountered.
#[derive(Debug, Clone)]
pub struct JobPlan {
    /// Scene identifiers that survived filtering, chronologically ordered
    pub scene_names: Vec<String>,
    pub matrix: JobMatrix,
    /// Acquisitions handed in by the search collaborator
    pub candidates: usize,
    /// Acquisitions remaining after the overlap filter
    pub survivors: usize,
    pub warnings: Vec<StackWarning>,
}

impl JobPlan {
    pub fn pair_count(&self) -> usize {
        self.matrix.include.len()
    }
}

/// Run the full planning pipeline: overlap filter, chronological
/// ordering, pair selection, job-matrix emission.
///
/// Configuration problems and a degenerate reference footprint abort
/// before any output is produced; an empty search result or a filter that
/// removes everything completes with an empty plan and a warning.
pub fn plan_jobs(
    acquisitions: Vec<Acquisition>,
    reference: &Polygon<f64>,
    config: &PlanConfig,
) -> StackResult<JobPlan> {
    // Surface configuration problems before touching the data
    let selector = PairSelector::new(config.strategy.clone())?;

    let candidates = acquisitions.len();
    log::info!("Planning over {} candidate acquisitions", candidates);

    let survivors = filter_by_overlap(acquisitions, reference, config.overlap_threshold)?;
    let mut warnings = Vec::new();
    if survivors.is_empty() && candidates > 0 {
        let warning = StackWarning::NoSurvivors { total: candidates };
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let stack = AcquisitionStack::from_unordered(survivors);
    log::info!("Number of acquisitions: {}", stack.len());
    if let Some((first, last)) = stack.time_span() {
        log::info!("Timespan: {} to {}", first, last);
    }

    let outcome = selector.select_pairs(&stack);
    warnings.extend(outcome.warnings);

    Ok(JobPlan {
        scene_names: stack.scene_names(),
        survivors: stack.len(),
        matrix: JobMatrixEmitter::emit(outcome.pairs),
        candidates,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Platform, Polarization, StackError};
    use chrono::{TimeZone, Utc};
    use geo_types::{coord, LineString};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                coord! { x: min_x, y: min_y },
                coord! { x: max_x, y: min_y },
                coord! { x: max_x, y: max_y },
                coord! { x: min_x, y: max_y },
                coord! { x: min_x, y: min_y },
            ]),
            vec![],
        )
    }

    fn acquisition(day: i64, footprint: Polygon<f64>) -> Acquisition {
        let start = Utc.with_ymd_and_hms(2020, 1, 3, 17, 8, 15).unwrap()
            + chrono::Duration::days(day);
        Acquisition {
            scene_name: format!("S1_136231_IW2_{}_VV_7C85-BURST", start.format("%Y%m%dT%H%M%S")),
            start_time: start,
            footprint,
            relative_orbit: 136,
            polarization: Polarization::VV,
            platform: Platform::Sentinel1A,
        }
    }

    fn dense_config() -> PlanConfig {
        PlanConfig {
            overlap_threshold: 0.8,
            strategy: PairingStrategy::Dense {
                max_skip: 1,
                window_end: None,
            },
        }
    }

    #[test]
    fn test_plan_filters_and_pairs() {
        let reference = rect(0.0, 0.0, 1.0, 1.0);
        let acquisitions = vec![
            acquisition(0, rect(0.0, 0.0, 1.0, 1.0)),
            acquisition(12, rect(0.5, 0.0, 1.5, 1.0)), // overlap 0.5, filtered
            acquisition(24, rect(0.0, 0.0, 1.0, 1.0)),
            acquisition(36, rect(0.0, 0.0, 1.0, 1.0)),
        ];

        let plan = plan_jobs(acquisitions, &reference, &dense_config()).unwrap();
        assert_eq!(plan.candidates, 4);
        assert_eq!(plan.survivors, 3);
        assert_eq!(plan.scene_names.len(), 3);
        assert_eq!(plan.pair_count(), 2);
        // Final survivor has no n+1 partner
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_plan_empty_input() {
        let reference = rect(0.0, 0.0, 1.0, 1.0);
        let plan = plan_jobs(vec![], &reference, &dense_config()).unwrap();
        assert_eq!(plan.candidates, 0);
        assert_eq!(plan.survivors, 0);
        assert_eq!(plan.pair_count(), 0);
        assert!(plan.scene_names.is_empty());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_plan_all_filtered_out() {
        let reference = rect(0.0, 0.0, 1.0, 1.0);
        let acquisitions = vec![
            acquisition(0, rect(5.0, 5.0, 6.0, 6.0)),
            acquisition(12, rect(5.0, 5.0, 6.0, 6.0)),
        ];
        let plan = plan_jobs(acquisitions, &reference, &dense_config()).unwrap();
        assert_eq!(plan.survivors, 0);
        assert_eq!(plan.pair_count(), 0);
        assert_eq!(
            plan.warnings,
            vec![StackWarning::NoSurvivors { total: 2 }]
        );
    }

    #[test]
    fn test_plan_rejects_bad_config_before_processing() {
        let reference = rect(0.0, 0.0, 1.0, 1.0);
        let config = PlanConfig {
            overlap_threshold: 0.8,
            strategy: PairingStrategy::Dense {
                max_skip: 0,
                window_end: None,
            },
        };
        assert!(matches!(
            plan_jobs(vec![], &reference, &config),
            Err(StackError::Configuration(_))
        ));
    }

    #[test]
    fn test_plan_degenerate_reference_is_fatal() {
        let degenerate = Polygon::new(
            LineString::from(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 1.0, y: 0.0 },
                coord! { x: 0.0, y: 0.0 },
            ]),
            vec![],
        );
        let acquisitions = vec![acquisition(0, rect(0.0, 0.0, 1.0, 1.0))];
        assert!(matches!(
            plan_jobs(acquisitions, &degenerate, &dense_config()),
            Err(StackError::Geometry(_))
        ));
    }
}
