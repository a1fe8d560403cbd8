use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PlantConfig;
use crate::data::cache::DatasetCache;
use crate::data::export::export_csv;
use crate::data::heatmap::Heatmap;
use crate::data::model::{Column, PlantDataset};
use crate::data::summary::Summary;
use crate::data::window::{select_window, WindowView};
use crate::data::DataError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Plant constants used for derivation and defaults.
    pub config: PlantConfig,

    /// Derived tables loaded so far, by path.
    cache: DatasetCache,

    /// Path of the dataset currently shown.
    pub data_path: Option<PathBuf>,

    /// Current derived table (None until a file loads).
    pub dataset: Option<Arc<PlantDataset>>,

    /// Full-table statistics; None for an empty table.
    pub summary: Option<Summary>,

    /// Current half-open row window; always valid for `dataset`.
    range: (usize, usize),

    /// Thermal heatmap of the current window (cached per range).
    pub heatmap: Option<Heatmap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PlantConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            data_path: None,
            dataset: None,
            summary: None,
            range: (0, 0),
            heatmap: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and show it.
    ///
    /// On failure the message is kept for the UI and any dataset already
    /// shown stays in place.
    pub fn open(&mut self, path: &Path) {
        match self.cache.load(path, &self.config) {
            Ok(dataset) => self.set_dataset(path, dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a derived dataset: compute the summary and reset the window.
    pub fn set_dataset(&mut self, path: &Path, dataset: Arc<PlantDataset>) {
        self.status_message = None;
        self.summary = match Summary::compute(&dataset) {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                self.status_message = Some(e.to_string());
                None
            }
        };
        self.range = self.config.default_window(dataset.len());
        self.data_path = Some(path.to_path_buf());
        self.dataset = Some(dataset);
        self.recompute_window();
    }

    pub fn range(&self) -> (usize, usize) {
        self.range
    }

    /// Move the window to `[start, end)`.
    ///
    /// Out-of-domain ranges are rejected and the current window is kept;
    /// the caller is expected to clamp its controls and retry.
    pub fn set_range(&mut self, start: usize, end: usize) -> Result<(), DataError> {
        let dataset = self.dataset.as_ref().ok_or(DataError::InvalidRange {
            start,
            end,
            len: 0,
        })?;
        select_window(dataset, start, end)?;
        if self.range != (start, end) {
            self.range = (start, end);
            self.recompute_window();
        }
        Ok(())
    }

    /// The current window, borrowed from the cached table.
    pub fn window(&self) -> Option<WindowView<'_>> {
        let dataset = self.dataset.as_deref()?;
        // `range` is validated before it is stored and reset with the dataset.
        select_window(dataset, self.range.0, self.range.1).ok()
    }

    /// Rebuild everything that depends on the window.
    pub fn recompute_window(&mut self) {
        let bins = self.config.heatmap_bins;
        let heatmap = self.window().and_then(|view| {
            log::debug!(
                "Window {:?} of {} rows",
                view.source_range(),
                self.dataset.as_ref().map_or(0, |d| d.len())
            );
            Heatmap::build(
                &view,
                Column::AmbientTemp,
                Column::ModuleTemp,
                Column::WindSpeed,
                bins,
            )
        });
        self.heatmap = heatmap;
    }

    /// Write the current window to `path` as CSV.
    pub fn export_window(&mut self, path: &Path) {
        let Some(view) = self.window() else {
            self.status_message = Some("Nothing to export: no dataset loaded".to_string());
            return;
        };
        let rows = view.len();
        match export_csv(&view, path) {
            Ok(()) => {
                log::info!("Exported {rows} readings to {}", path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export to {}: {e}", path.display());
                self.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;

    fn write_plant_csv(dir: &Path, name: &str, rows: usize) -> PathBuf {
        let mut text = String::from(
            "MODULE_TEMP,Amb_Temp,WIND_Speed,IRR (W/m2),AC Power in Watts,\
             DC Current in Amps,AC Ir in Amps,AC Iy in Amps,AC Ib in Amps\n",
        );
        for i in 0..rows {
            let irr = (i % 1000) as f64;
            writeln!(
                text,
                "{},{},{},{},{},{},{},{},{}",
                30.0 + irr / 50.0,
                25.0,
                (i % 7) as f64,
                irr,
                irr * 1500.0,
                irr * 2.0,
                irr,
                irr,
                irr
            )
            .unwrap();
        }
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn default_window_is_capped_at_ten_thousand_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "big.csv", 12_000);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        assert_eq!(state.range(), (0, 10_000));
        assert_eq!(state.window().unwrap().len(), 10_000);
        assert!(state.summary.is_some());
        assert!(state.heatmap.is_some());
    }

    #[test]
    fn small_dataset_window_covers_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "small.csv", 3);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        assert_eq!(state.range(), (0, 3));
        state.set_range(1, 3).unwrap();
        let view = state.window().unwrap();
        assert_eq!(view.source_range(), 1..3);
    }

    #[test]
    fn invalid_range_keeps_previous_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "ten.csv", 10);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        state.set_range(2, 8).unwrap();
        let err = state.set_range(5, 2).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
        assert_eq!(state.range(), (2, 8));
    }

    #[test]
    fn missing_file_keeps_current_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "ok.csv", 5);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        state.open(&dir.path().join("missing.csv.zip"));

        let msg = state.status_message.clone().unwrap();
        assert!(msg.contains("input file not found"), "{msg}");
        assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(5));
        assert_eq!(state.data_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_file_on_startup_builds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(PlantConfig::default());
        state.open(&dir.path().join("Generation_data.csv.zip"));
        assert!(state.dataset.is_none());
        assert!(state.summary.is_none());
        assert!(state.window().is_none());
        assert!(state.set_range(0, 0).is_err());
    }

    #[test]
    fn empty_dataset_has_no_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "empty.csv", 0);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        assert!(state.summary.is_none());
        assert!(state.status_message.is_some());
        assert_eq!(state.range(), (0, 0));
        assert!(state.window().unwrap().is_empty());
    }

    #[test]
    fn export_writes_the_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plant_csv(dir.path(), "plant.csv", 20);
        let mut state = AppState::new(PlantConfig::default());
        state.open(&path);
        state.set_range(5, 9).unwrap();

        let out = dir.path().join("window.csv");
        state.export_window(&out);
        assert!(state.status_message.is_none());
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(1).unwrap().starts_with("2024-01-01T00:00:25,"));
    }
}
