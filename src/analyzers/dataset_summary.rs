use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::error::{DashboardError, Result};
use crate::models::{NumericColumn, ObservationTable};

#[derive(Debug)]
pub struct StationCount {
    pub station: String,
    pub records: usize,
}

#[derive(Debug)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub stations: Vec<StationCount>,
    pub time_range: (NaiveDateTime, NaiveDateTime),
    /// Missing values per numeric column, in correlation display order
    pub missing: Vec<(NumericColumn, usize)>,
}

impl DatasetSummary {
    pub fn from_table(table: &ObservationTable) -> Result<Self> {
        let time_range = table
            .time_range()
            .ok_or_else(|| DashboardError::EmptyDataset("no records to summarise".to_string()))?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in table {
            *counts.entry(record.station.as_str()).or_default() += 1;
        }
        let stations = table
            .stations()
            .into_iter()
            .map(|station| StationCount {
                station: station.to_string(),
                records: counts.get(station).copied().unwrap_or(0),
            })
            .collect();

        let missing = NumericColumn::CORRELATION_SET
            .iter()
            .map(|column| (*column, table.iter().filter(|r| column.value(r).is_none()).count()))
            .collect();

        Ok(Self {
            total_records: table.len(),
            stations,
            time_range,
            missing,
        })
    }

    pub fn missing_percentage(&self, missing: usize) -> f64 {
        (missing as f64 / self.total_records as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        let stations = self
            .stations
            .iter()
            .map(|s| format!("  - {} ({} records)", s.station, s.records))
            .collect::<Vec<_>>()
            .join("\n");

        let missing = self
            .missing
            .iter()
            .map(|(column, count)| {
                format!(
                    "  - {}: {} ({:.1}%)",
                    column,
                    count,
                    self.missing_percentage(*count)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Records: {} total\n\
            Date Range: {} to {}\n\
            Stations ({}):\n{}\n\
            Missing values:\n{}",
            self.total_records,
            self.time_range.0.format("%Y-%m-%d %H:%M"),
            self.time_range.1.format("%Y-%m-%d %H:%M"),
            self.stations.len(),
            stations,
            missing
        )
    }
}
