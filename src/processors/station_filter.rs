use crate::error::{DashboardError, Result};
use crate::models::{ObservationRecord, ObservationTable};
use tracing::{debug, warn};

/// Selects the rows recorded at a single station.
#[derive(Debug, Clone)]
pub struct StationFilter {
    station: String,
}

impl StationFilter {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
        }
    }

    /// Pick the requested station, or the first one in the table when none is given.
    pub fn resolve(table: &ObservationTable, requested: Option<&str>) -> Result<Self> {
        match requested {
            Some(station) if table.contains_station(station) => Ok(Self::new(station)),
            Some(station) => Err(DashboardError::StationNotFound {
                station: station.to_string(),
            }),
            None => table
                .stations()
                .first()
                .map(|s| Self::new(*s))
                .ok_or_else(|| DashboardError::EmptyDataset("no stations to select".to_string())),
        }
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn matches(&self, record: &ObservationRecord) -> bool {
        record.station == self.station
    }

    /// Rows for this station with column values and row order preserved
    pub fn apply(&self, table: &ObservationTable) -> ObservationTable {
        let filtered: ObservationTable = table.iter().filter(|r| self.matches(r)).cloned().collect();

        if filtered.is_empty() {
            warn!(station = %self.station, "Station filter matched no rows");
        } else {
            debug!(station = %self.station, rows = filtered.len(), "Station filter applied");
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation::build_timestamp;
    use crate::models::NumericColumn;
    use std::collections::HashSet;

    fn table() -> ObservationTable {
        let stations = ["Dongsi", "Wanliu", "Dongsi", "Gucheng", "Wanliu", "Dongsi"];
        stations
            .iter()
            .enumerate()
            .map(|(i, s)| {
                ObservationRecord::new(*s, build_timestamp(2014, 1, 1, i as u32).unwrap())
                    .with_value(NumericColumn::Pm25, Some(i as f64))
            })
            .collect()
    }

    #[test]
    fn test_filter_yields_single_station() {
        let table = table();
        for station in table.stations() {
            let filtered = StationFilter::new(station).apply(&table);
            let seen: HashSet<&str> = filtered.iter().map(|r| r.station.as_str()).collect();
            assert_eq!(seen, HashSet::from([station]));
        }
    }

    #[test]
    fn test_filter_preserves_order_and_columns() {
        let filtered = StationFilter::new("Dongsi").apply(&table());
        let values: Vec<Option<f64>> = filtered.iter().map(|r| r.pm25).collect();
        assert_eq!(values, vec![Some(0.0), Some(2.0), Some(5.0)]);
    }

    #[test]
    fn test_unknown_station_gives_empty_table() {
        assert!(StationFilter::new("Shunyi").apply(&table()).is_empty());
    }

    #[test]
    fn test_resolve_station() {
        let table = table();
        assert_eq!(StationFilter::resolve(&table, None).unwrap().station(), "Dongsi");
        assert_eq!(
            StationFilter::resolve(&table, Some("Gucheng")).unwrap().station(),
            "Gucheng"
        );
        assert!(matches!(
            StationFilter::resolve(&table, Some("Shunyi")),
            Err(DashboardError::StationNotFound { .. })
        ));
        assert!(matches!(
            StationFilter::resolve(&ObservationTable::default(), None),
            Err(DashboardError::EmptyDataset(_))
        ));
    }
}
