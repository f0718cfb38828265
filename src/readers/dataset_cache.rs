use crate::error::Result;
use crate::models::ObservationTable;
use crate::readers::ObservationReader;
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Load-once holder for the base observation table.
///
/// The file is read on the first call to [`DatasetCache::get_or_load`]; later
/// calls hand out the same shared table until [`DatasetCache::reset`].
pub struct DatasetCache {
    path: PathBuf,
    reader: ObservationReader,
    loaded: bool,
    table: Option<Arc<ObservationTable>>,
    load_count: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_reader(path, ObservationReader::new())
    }

    pub fn with_reader(path: impl Into<PathBuf>, reader: ObservationReader) -> Self {
        Self {
            path: path.into(),
            reader,
            loaded: false,
            table: None,
            load_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of times the file has actually been read
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    pub fn get_or_load(
        &mut self,
        progress: Option<&ProgressReporter>,
    ) -> Result<Arc<ObservationTable>> {
        if self.loaded {
            if let Some(table) = &self.table {
                debug!(path = %self.path.display(), "Observation table served from cache");
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(self.reader.read_observations(&self.path, progress)?);
        self.load_count += 1;
        self.table = Some(Arc::clone(&table));
        self.loaded = true;

        Ok(table)
    }

    pub fn reset(&mut self) {
        debug!(path = %self.path.display(), "Observation cache reset");
        self.loaded = false;
        self.table = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "year,month,day,hour,station,PM2.5,TEMP,PRES,DEWP,WSPM").unwrap();
        writeln!(file, "2013,3,1,0,Dongsi,9.0,-0.5,1024.5,-21.4,5.7").unwrap();
        writeln!(file, "2013,3,1,1,Dongsi,4.0,-0.7,1025.1,-22.1,3.9").unwrap();
        file
    }

    #[test]
    fn test_loads_once() -> Result<()> {
        let file = fixture();
        let mut cache = DatasetCache::new(file.path());
        assert!(!cache.is_loaded());

        let first = cache.get_or_load(None)?;
        let second = cache.get_or_load(None)?;

        assert!(cache.is_loaded());
        assert_eq!(cache.load_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
        Ok(())
    }

    #[test]
    fn test_reset_forces_reload() -> Result<()> {
        let file = fixture();
        let mut cache = DatasetCache::new(file.path());

        let first = cache.get_or_load(None)?;
        cache.reset();
        assert!(!cache.is_loaded());

        let second = cache.get_or_load(None)?;
        assert_eq!(cache.load_count(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        Ok(())
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let mut cache = DatasetCache::new("missing/submission.csv");

        let result = cache.get_or_load(None);
        assert!(matches!(result, Err(DashboardError::Io(_))));
        assert!(!cache.is_loaded());
        assert_eq!(cache.load_count(), 0);
    }
}
