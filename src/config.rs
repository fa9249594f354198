//! Configuration for the measurement UI.

use std::path::PathBuf;
use std::sync::Arc;

use crate::controllers::SessionController;
use crate::ledger::default_categories;

/// Configuration consumed by [`run_livemeasure`](crate::app::run_livemeasure)
/// and by embedded [`MeasurePanel`](crate::app::MeasurePanel) hosts.
///
/// All storage locations default to paths under `data_dir`; each can be
/// overridden individually.
pub struct LiveMeasureConfig {
    /// Window title.
    pub title: String,
    /// Base directory for calibration, log, snapshots and UI state.
    pub data_dir: PathBuf,
    /// Override for the calibration text file.
    pub calibration_path: Option<PathBuf>,
    /// Override for the CSV measurement log.
    pub log_path: Option<PathBuf>,
    /// Override for the snapshot image root.
    pub snapshot_root: Option<PathBuf>,
    /// Override for the persisted UI state (last subject/category).
    pub ui_state_path: Option<PathBuf>,
    /// The closed set of allowed category labels.
    pub categories: Vec<String>,
    /// Initial subject identifier.
    pub subject: String,
    /// Decimal places for lengths written to the CSV log.
    pub length_decimals: usize,
    /// Decimal places for the calibration factor shown in the UI.
    pub calibration_display_decimals: usize,
    /// Optional controller for driving the session from external code.
    pub session_controller: Option<SessionController>,
    /// Called when the operator requests a device reconnect; wired by the
    /// embedder that owns the acquisition backend. `None` hides the button.
    pub reconnect: Option<Arc<dyn Fn() + Send + Sync>>,
    /// Native window options. `None` uses a sensible default size.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for LiveMeasureConfig {
    fn default() -> Self {
        Self {
            title: "LiveMeasure".to_string(),
            data_dir: PathBuf::from("."),
            calibration_path: None,
            log_path: None,
            snapshot_root: None,
            ui_state_path: None,
            categories: default_categories(),
            subject: String::new(),
            length_decimals: 3,
            calibration_display_decimals: 4,
            session_controller: None,
            reconnect: None,
            native_options: None,
        }
    }
}

impl LiveMeasureConfig {
    pub fn calibration_path(&self) -> PathBuf {
        self.calibration_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("calibration.txt"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("measurements.csv"))
    }

    pub fn snapshot_root(&self) -> PathBuf {
        self.snapshot_root
            .clone()
            .unwrap_or_else(|| self.data_dir.join("pictures"))
    }

    pub fn ui_state_path(&self) -> PathBuf {
        self.ui_state_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("livemeasure_state.json"))
    }
}

impl std::fmt::Debug for LiveMeasureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveMeasureConfig")
            .field("title", &self.title)
            .field("data_dir", &self.data_dir)
            .field("categories", &self.categories)
            .field("subject", &self.subject)
            .finish()
    }
}
