use crate::types::Acquisition;
use chrono::{DateTime, Datelike, Utc};

/// A chronologically ordered acquisition stack over one target footprint.
///
/// Construction sorts ascending by start time with a stable sort, so
/// acquisitions sharing a timestamp keep their retrieval order. Length is
/// always preserved; filtering happens before a stack is built.
#[derive(Debug, Clone)]
pub struct AcquisitionStack {
    acquisitions: Vec<Acquisition>,
}

impl AcquisitionStack {
    /// Build a stack from acquisitions in arbitrary order
    pub fn from_unordered(mut acquisitions: Vec<Acquisition>) -> Self {
        acquisitions.sort_by_key(|a| a.start_time);
        log::debug!("Ordered stack of {} acquisitions", acquisitions.len());
        Self { acquisitions }
    }

    pub fn len(&self) -> usize {
        self.acquisitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acquisitions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Acquisition> {
        self.acquisitions.get(index)
    }

    /// Ordered view of the underlying acquisitions
    pub fn acquisitions(&self) -> &[Acquisition] {
        &self.acquisitions
    }

    /// Scene identifiers in chronological order
    pub fn scene_names(&self) -> Vec<String> {
        self.acquisitions
            .iter()
            .map(|a| a.scene_name.clone())
            .collect()
    }

    /// Index of the acquisition whose start time is closest to `target`.
    /// Ties resolve to the earlier index. `None` on an empty stack.
    pub fn index_nearest(&self, target: DateTime<Utc>) -> Option<usize> {
        self.acquisitions
            .iter()
            .enumerate()
            .min_by_key(|(_, a)| (a.start_time - target).num_milliseconds().abs())
            .map(|(index, _)| index)
    }

    /// Highest index whose acquisition falls within the given calendar
    /// year. Used to bound dense-strategy references to one year while
    /// still letting secondaries extend past it.
    pub fn last_index_in_year(&self, year: i32) -> Option<usize> {
        self.acquisitions
            .iter()
            .rposition(|a| a.start_time.year() == year)
    }

    /// Start times of the first and last acquisitions
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.acquisitions.first(), self.acquisitions.last()) {
            (Some(first), Some(last)) => Some((first.start_time, last.start_time)),
            _ => None,
        }
    }
}
