use crate::error::{DashboardError, Result};
use crate::models::{ObservationRecord, ObservationTable, RawObservation};
use crate::utils::constants::REQUIRED_COLUMNS;
use crate::utils::progress::ProgressReporter;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

const BUFFER_SIZE: usize = 8192 * 16; // 128KB
const PROGRESS_INTERVAL: usize = 50_000;

pub struct ObservationReader {
    delimiter: u8,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read every observation from a delimited file
    pub fn read_observations(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<ObservationTable> {
        let started = Instant::now();
        debug!(path = %path.display(), "Opening observation file");

        let file = File::open(path)?;
        let reader = BufReader::with_capacity(BUFFER_SIZE, file);
        let table = self.read_from(reader, progress)?;

        info!(
            path = %path.display(),
            rows = table.len(),
            stations = table.stations().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded observation table"
        );

        Ok(table)
    }

    /// Read observations from any byte source with a header row
    pub fn read_from<R: Read>(
        &self,
        source: R,
        progress: Option<&ProgressReporter>,
    ) -> Result<ObservationTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = csv_reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::InvalidFormat(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<RawObservation>().enumerate() {
            let raw = row?;
            // Header is line 1
            let line = index + 2;
            let record = ObservationRecord::from_raw(raw)
                .map_err(|e| DashboardError::InvalidFormat(format!("Line {}: {}", line, e)))?;
            records.push(record);

            if let Some(p) = progress {
                if records.len() % PROGRESS_INTERVAL == 0 {
                    p.set_message(&format!("Loading observations... {} rows", records.len()));
                }
            }
        }

        Ok(ObservationTable::new(records))
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}
