use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::models::ObservationRecord;

/// In-memory observation table. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    records: Vec<ObservationRecord>,
}

impl ObservationTable {
    pub fn new(records: Vec<ObservationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObservationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct station identifiers in order of first appearance.
    pub fn stations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.station.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn contains_station(&self, station: &str) -> bool {
        self.records.iter().any(|r| r.station == station)
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.first()?.timestamp;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.timestamp), hi.max(r.timestamp))
        }))
    }
}

impl FromIterator<ObservationRecord> for ObservationTable {
    fn from_iter<I: IntoIterator<Item = ObservationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a ObservationRecord;
    type IntoIter = std::slice::Iter<'a, ObservationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
