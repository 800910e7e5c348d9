use crate::core::stack::AcquisitionStack;
use crate::types::{Acquisition, Pair, StackError, StackResult, StackWarning};
use chrono::Duration;
use regex::Regex;

/// 365-day years, matching the workflow's interval arithmetic
const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Pair selection policy over an ordered acquisition stack
#[derive(Debug, Clone, PartialEq)]
pub enum PairingStrategy {
    /// Connect each candidate reference to its next `max_skip`
    /// chronological neighbors. `window_end` optionally bounds the
    /// highest reference index (inclusive), so references stay within a
    /// target calendar year while secondaries may extend past it.
    Dense {
        max_skip: usize,
        window_end: Option<usize>,
    },
    /// Connect each acquisition to the acquisition nearest a fixed
    /// multi-year interval ahead of it
    Offset { interval_years: f64 },
}

impl PairingStrategy {
    /// Reject parameter values that cannot drive a run
    pub fn validate(&self) -> StackResult<()> {
        match self {
            PairingStrategy::Dense { max_skip, .. } => {
                if *max_skip == 0 {
                    return Err(StackError::Configuration(
                        "Dense pairing requires max_skip >= 1".to_string(),
                    ));
                }
            }
            PairingStrategy::Offset { interval_years } => {
                if !interval_years.is_finite() || *interval_years <= 0.0 {
                    return Err(StackError::Configuration(format!(
                        "Offset pairing requires a positive interval, got {}",
                        interval_years
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Pairs formed by a selection run plus the combinations that could not
/// be formed. Infeasible combinations never abort a run.
#[derive(Debug, Clone)]
pub struct PairingOutcome {
    pub pairs: Vec<Pair>,
    pub warnings: Vec<StackWarning>,
}

/// Selects reference/secondary pairs from an ordered acquisition stack
pub struct PairSelector {
    strategy: PairingStrategy,
    date_token: Regex,
}

impl PairSelector {
    pub fn new(strategy: PairingStrategy) -> StackResult<Self> {
        strategy.validate()?;
        let date_token = Regex::new(r"(\d{8})T\d{6}")
            .map_err(|e| StackError::Configuration(format!("Date token pattern: {}", e)))?;
        Ok(Self {
            strategy,
            date_token,
        })
    }

    /// Select pairs under the configured strategy. An empty stack yields
    /// an empty outcome.
    pub fn select_pairs(&self, stack: &AcquisitionStack) -> PairingOutcome {
        if stack.is_empty() {
            return PairingOutcome {
                pairs: Vec::new(),
                warnings: Vec::new(),
            };
        }

        let outcome = match &self.strategy {
            PairingStrategy::Dense {
                max_skip,
                window_end,
            } => self.select_dense(stack, *max_skip, *window_end),
            PairingStrategy::Offset { interval_years } => {
                self.select_offset(stack, *interval_years)
            }
        };

        log::info!(
            "Selected {} interferogram pairs ({} combinations infeasible)",
            outcome.pairs.len(),
            outcome.warnings.len()
        );
        outcome
    }

    fn select_dense(
        &self,
        stack: &AcquisitionStack,
        max_skip: usize,
        window_end: Option<usize>,
    ) -> PairingOutcome {
        let ordered = stack.acquisitions();
        let last = ordered.len() - 1;
        // The cutoff acquisition itself is a candidate reference; a
        // window past the end of the stack is clamped, since the cutoff
        // is usually derived from a sparse final year.
        let end = window_end.map_or(last, |w| w.min(last));

        let mut pairs = Vec::new();
        let mut warnings = Vec::new();
        for r in 0..=end {
            let reference = &ordered[r];
            for s in 1..=max_skip {
                if r + s < ordered.len() {
                    pairs.push(self.make_pair(reference, &ordered[r + s]));
                } else {
                    // Expected near the end of the stack
                    let warning = StackWarning::InsufficientData {
                        reference: reference.scene_name.clone(),
                        skip: s,
                    };
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        PairingOutcome { pairs, warnings }
    }

    fn select_offset(&self, stack: &AcquisitionStack, interval_years: f64) -> PairingOutcome {
        let ordered = stack.acquisitions();
        let interval = Duration::seconds((interval_years * SECONDS_PER_YEAR).round() as i64);
        // from_unordered guarantees the last acquisition is the latest
        let latest = ordered[ordered.len() - 1].start_time;

        let mut pairs = Vec::new();
        let mut warnings = Vec::new();
        for reference in ordered {
            if latest - reference.start_time < interval {
                log::info!(
                    "{} within {} years of the final acquisition, stopping",
                    reference.scene_name,
                    interval_years
                );
                break;
            }

            let target = reference.start_time + interval;
            let nearest = match stack.index_nearest(target) {
                Some(index) => &ordered[index],
                None => break,
            };
            if nearest.start_time <= reference.start_time {
                // A large gap can pull the nearest match back to or
                // before the reference itself
                let warning = StackWarning::OffsetTargetMissed {
                    reference: reference.scene_name.clone(),
                };
                log::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            pairs.push(self.make_pair(reference, nearest));
        }

        PairingOutcome { pairs, warnings }
    }

    fn make_pair(&self, reference: &Acquisition, secondary: &Acquisition) -> Pair {
        Pair {
            reference: reference.scene_name.clone(),
            secondary: secondary.scene_name.clone(),
            name: format!(
                "{}_{}",
                self.scene_date(reference),
                self.scene_date(secondary)
            ),
        }
    }

    /// YYYYMMDD token from the scene identifier, falling back to the
    /// acquisition start date for identifiers without one
    fn scene_date(&self, acquisition: &Acquisition) -> String {
        self.date_token
            .captures(&acquisition.scene_name)
            .and_then(|captures| captures.get(1))
            .map(|token| token.as_str().to_string())
            .unwrap_or_else(|| acquisition.start_time.format("%Y%m%d").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Platform, Polarization};
    use chrono::{DateTime, TimeZone, Utc};
    use geo_types::{coord, LineString, Polygon};
    use std::collections::HashSet;

    fn footprint() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 1.0, y: 0.0 },
                coord! { x: 1.0, y: 1.0 },
                coord! { x: 0.0, y: 1.0 },
                coord! { x: 0.0, y: 0.0 },
            ]),
            vec![],
        )
    }

    fn acquisition_at(time: DateTime<Utc>) -> Acquisition {
        let scene_name = format!(
            "S1_136231_IW2_{}_VV_7C85-BURST",
            time.format("%Y%m%dT%H%M%S")
        );
        Acquisition {
            scene_name,
            start_time: time,
            footprint: footprint(),
            relative_orbit: 136,
            polarization: Polarization::VV,
            platform: Platform::Sentinel1A,
        }
    }

    fn stack_every_n_days(count: usize, cadence_days: i64) -> AcquisitionStack {
        let start = Utc.with_ymd_and_hms(2020, 1, 3, 17, 8, 15).unwrap();
        let acquisitions = (0..count)
            .map(|i| acquisition_at(start + chrono::Duration::days(i as i64 * cadence_days)))
            .collect();
        AcquisitionStack::from_unordered(acquisitions)
    }

    #[test]
    fn test_dense_five_acquisitions_skip_two() {
        let stack = stack_every_n_days(5, 12);
        let selector = PairSelector::new(PairingStrategy::Dense {
            max_skip: 2,
            window_end: Some(4),
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);

        let index_pairs: Vec<(usize, usize)> = outcome
            .pairs
            .iter()
            .map(|pair| {
                let names = stack.scene_names();
                (
                    names.iter().position(|n| n == &pair.reference).unwrap(),
                    names.iter().position(|n| n == &pair.secondary).unwrap(),
                )
            })
            .collect();
        assert_eq!(
            index_pairs,
            vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)]
        );

        // r=3,s=2 and r=4,s=1..2 run off the end of the stack
        assert_eq!(outcome.warnings.len(), 3);
        let names = stack.scene_names();
        assert_eq!(
            outcome.warnings[0],
            StackWarning::InsufficientData {
                reference: names[3].clone(),
                skip: 2,
            }
        );
        assert!(matches!(
            &outcome.warnings[1],
            StackWarning::InsufficientData { reference, skip: 1 } if reference == &names[4]
        ));
    }

    #[test]
    fn test_dense_window_restricts_references() {
        let stack = stack_every_n_days(6, 12);
        let selector = PairSelector::new(PairingStrategy::Dense {
            max_skip: 1,
            window_end: Some(2),
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);

        assert_eq!(outcome.pairs.len(), 3);
        let names = stack.scene_names();
        // The cutoff index itself still pairs forward
        assert_eq!(outcome.pairs[2].reference, names[2]);
        assert_eq!(outcome.pairs[2].secondary, names[3]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_dense_window_beyond_stack_is_clamped() {
        let stack = stack_every_n_days(3, 12);
        let selector = PairSelector::new(PairingStrategy::Dense {
            max_skip: 1,
            window_end: Some(10),
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);
        assert_eq!(outcome.pairs.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_pair_name_from_identifier_dates() {
        let stack = stack_every_n_days(2, 12);
        let selector = PairSelector::new(PairingStrategy::Dense {
            max_skip: 1,
            window_end: None,
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);
        assert_eq!(outcome.pairs[0].name, "20200103_20200115");
    }

    #[test]
    fn test_pair_name_falls_back_to_start_time() {
        let start = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap();
        let mut first = acquisition_at(start);
        first.scene_name = "scene-without-date".to_string();
        let second = acquisition_at(start + chrono::Duration::days(12));
        let stack = AcquisitionStack::from_unordered(vec![first, second]);

        let selector = PairSelector::new(PairingStrategy::Dense {
            max_skip: 1,
            window_end: None,
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);
        assert_eq!(outcome.pairs[0].name, "20200103_20200115");
    }

    #[test]
    fn test_reference_strictly_earlier_and_no_duplicates() {
        let stack = stack_every_n_days(20, 12);
        for strategy in [
            PairingStrategy::Dense {
                max_skip: 3,
                window_end: None,
            },
            PairingStrategy::Offset {
                interval_years: 0.2,
            },
        ] {
            let selector = PairSelector::new(strategy).unwrap();
            let outcome = selector.select_pairs(&stack);
            assert!(!outcome.pairs.is_empty());

            let mut seen = HashSet::new();
            for pair in &outcome.pairs {
                let reference = stack
                    .acquisitions()
                    .iter()
                    .find(|a| a.scene_name == pair.reference)
                    .unwrap();
                let secondary = stack
                    .acquisitions()
                    .iter()
                    .find(|a| a.scene_name == pair.secondary)
                    .unwrap();
                assert!(reference.start_time < secondary.start_time);

                let key = (pair.reference.clone(), pair.secondary.clone());
                assert!(seen.insert(key), "duplicate pair {}", pair.name);
            }
        }
    }

    #[test]
    fn test_offset_yearly_interval() {
        // 30-day cadence over four years
        let stack = stack_every_n_days(49, 30);
        let selector = PairSelector::new(PairingStrategy::Offset {
            interval_years: 1.0,
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);

        // References run until under 365 days remain to the final
        // acquisition: days 0, 30, ..., 1050
        assert_eq!(outcome.pairs.len(), 36);
        assert!(outcome.warnings.is_empty());

        for pair in &outcome.pairs {
            let reference = stack
                .acquisitions()
                .iter()
                .find(|a| a.scene_name == pair.reference)
                .unwrap();
            let secondary = stack
                .acquisitions()
                .iter()
                .find(|a| a.scene_name == pair.secondary)
                .unwrap();
            // Nearest slot to start + 365 d on a 30-day cadence is 360 d
            let separation = secondary.start_time - reference.start_time;
            assert_eq!(separation.num_days(), 360);
        }
    }

    #[test]
    fn test_offset_large_gap_misses_target() {
        let start = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap();
        // Two acquisitions ~1000 days apart: the nearest match to
        // start + 365 d is the reference itself
        let stack = AcquisitionStack::from_unordered(vec![
            acquisition_at(start),
            acquisition_at(start + chrono::Duration::days(1000)),
        ]);
        let selector = PairSelector::new(PairingStrategy::Offset {
            interval_years: 1.0,
        })
        .unwrap();
        let outcome = selector.select_pairs(&stack);

        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            &outcome.warnings[0],
            StackWarning::OffsetTargetMissed { .. }
        ));
    }

    #[test]
    fn test_empty_stack_yields_empty_outcome() {
        let stack = AcquisitionStack::from_unordered(vec![]);
        for strategy in [
            PairingStrategy::Dense {
                max_skip: 2,
                window_end: None,
            },
            PairingStrategy::Offset {
                interval_years: 1.0,
            },
        ] {
            let selector = PairSelector::new(strategy).unwrap();
            let outcome = selector.select_pairs(&stack);
            assert!(outcome.pairs.is_empty());
            assert!(outcome.warnings.is_empty());
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(PairSelector::new(PairingStrategy::Dense {
            max_skip: 0,
            window_end: None,
        })
        .is_err());
        assert!(PairSelector::new(PairingStrategy::Offset {
            interval_years: 0.0,
        })
        .is_err());
        assert!(PairSelector::new(PairingStrategy::Offset {
            interval_years: -2.0,
        })
        .is_err());
    }
}
