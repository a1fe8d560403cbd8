use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::derive::derive_metrics;
use super::error::DataError;
use super::loader::load_file;
use super::model::PlantDataset;
use crate::config::PlantConfig;

/// Derived tables keyed by canonical input path.
///
/// Entries are never invalidated: input files are treated as static for the
/// lifetime of the process.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<PlantDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the derived table for `path`, loading and deriving it on the
    /// first request only.
    pub fn load(
        &mut self,
        path: &Path,
        config: &PlantConfig,
    ) -> Result<Arc<PlantDataset>, DataError> {
        let key = resolve(path)?;

        if let Some(dataset) = self.entries.get(&key) {
            log::info!("Cache hit for {} ({} readings)", key.display(), dataset.len());
            return Ok(Arc::clone(dataset));
        }

        let rows = load_file(&key, config)?;
        let dataset = Arc::new(derive_metrics(rows, config));
        log::info!(
            "Derived metrics for {} readings from {}",
            dataset.len(),
            key.display()
        );
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }
}

/// Canonical form of `path`; a path that does not resolve is a missing file.
fn resolve(path: &Path) -> Result<PathBuf, DataError> {
    path.canonicalize()
        .map_err(|_| DataError::MissingInputFile {
            path: path.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "MODULE_TEMP,Amb_Temp,WIND_Speed,IRR (W/m2),AC Power in Watts,\
                       DC Current in Amps,AC Ir in Amps,AC Iy in Amps,AC Ib in Amps\n\
                       45,25,3.5,1000,1000000,1500,800,810,805\n\
                       30,22,1.0,5,500,0,0,0,0\n";

    #[test]
    fn second_load_does_not_reread_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.csv");
        std::fs::write(&path, CSV).unwrap();

        let cfg = PlantConfig::default();
        let mut cache = DatasetCache::new();
        let first = cache.load(&path, &cfg).unwrap();

        // Overwriting the file must not change what the cache returns.
        std::fs::write(&path, "garbage").unwrap();
        let second = cache.load(&path, &cfg).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn equivalent_paths_share_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.csv");
        std::fs::write(&path, CSV).unwrap();
        let dotted = dir.path().join(".").join("plant.csv");

        let cfg = PlantConfig::default();
        let mut cache = DatasetCache::new();
        let a = cache.load(&path, &cfg).unwrap();
        let b = cache.load(&dotted, &cfg).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn missing_file_leaves_cache_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv.zip");
        let mut cache = DatasetCache::new();
        let err = cache.load(&path, &PlantConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingInputFile { path: p } if p == path));
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn loaded_table_is_derived() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.csv");
        std::fs::write(&path, CSV).unwrap();
        let ds = DatasetCache::new()
            .load(&path, &PlantConfig::default())
            .unwrap();
        assert_eq!(ds.readings[0].temp_delta, 20.0);
        assert_eq!(ds.readings[0].efficiency, 0.0005);
        assert_eq!(ds.readings[1].efficiency, 0.0);
    }
}
