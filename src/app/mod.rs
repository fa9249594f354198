//! Main application module for LiveMeasure.
//!
//! This module defines the core types and wiring for the measurement GUI.
//! It is split into focused sub-modules so that each concern can be
//! reasoned about independently:
//!
//! | Sub-module      | Responsibility |
//! | --------------- | -------------- |
//! | [`update`]      | Per-frame ingestion, controller requests, controls row and status line |
//! | [`feed`]        | The live-feed surface: texture upload, pointer gestures, line overlay |
//! | [`prompts`]     | The known-length and confirm-save modal prompts |
//! | [`measure_app`] | Standalone [`MeasureApp`] (eframe) wrapper |
//! | [`run`]         | Top-level [`run_livemeasure()`] entry point |

mod feed;
mod measure_app;
mod prompts;
mod run;
mod update;

pub use measure_app::MeasureApp;
pub use run::run_livemeasure;

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::calibration::CalibrationStore;
use crate::config::LiveMeasureConfig;
use crate::controllers::{SessionController, SessionStatus};
use crate::frame::Frame;
use crate::ledger::MeasurementLedger;
use crate::persistence::{self, UiStateSerde};
use crate::session::{LiveReadout, MeasurementSession};
use crate::sink::FrameCommand;

/// The central widget that owns the session, the ledger and the feed state.
///
/// `MeasurePanel` can be used standalone (wrapped in [`MeasureApp`] and run
/// via [`run_livemeasure`]) or embedded in a parent egui application by
/// calling [`MeasurePanel::update`] each frame.
pub struct MeasurePanel {
    // ── Data ────────────────────────────────────────────────────────────
    rx: Receiver<FrameCommand>,
    /// The interaction state machine (mode, drag, held frame, prompts).
    pub session: MeasurementSession,
    /// Record history, CSV log and snapshot store.
    pub ledger: MeasurementLedger,

    // ── Feed state ──────────────────────────────────────────────────────
    /// Newest frame accepted from the channel; frozen while the session
    /// holds the frame latch.
    current_frame: Option<Arc<Frame>>,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    /// Device error reported by the producer; `Some` means "no feed".
    device_error: Option<String>,

    // ── Operator-facing state ───────────────────────────────────────────
    subject_buf: String,
    known_length_input: String,
    status: String,
    live_readout: Option<LiveReadout>,
    last_committed: Option<(String, String, u32, f64)>,

    // ── Wiring ──────────────────────────────────────────────────────────
    controller: Option<SessionController>,
    reconnect: Option<Arc<dyn Fn() + Send + Sync>>,
    ui_state_path: PathBuf,
    calibration_display_decimals: usize,
    last_published: Option<SessionStatus>,
}

impl MeasurePanel {
    /// Build the panel from a frame channel and a configuration.
    ///
    /// Storage degrades instead of aborting: an unreadable measurement log
    /// starts an empty history and an unreadable UI state file falls back
    /// to the configured defaults (both reported on stderr).
    pub fn new(rx: Receiver<FrameCommand>, cfg: &LiveMeasureConfig) -> Self {
        let calibration = CalibrationStore::open(cfg.calibration_path());
        let ledger = MeasurementLedger::open(
            cfg.log_path(),
            cfg.snapshot_root(),
            cfg.categories.clone(),
            cfg.length_decimals,
        )
        .unwrap_or_else(|e| {
            eprintln!(
                "Failed to replay measurement log {:?}: {e}; starting with an empty history",
                cfg.log_path()
            );
            MeasurementLedger::empty(
                cfg.log_path(),
                cfg.snapshot_root(),
                cfg.categories.clone(),
                cfg.length_decimals,
            )
        });

        let mut session = MeasurementSession::new(calibration, cfg.categories.clone());
        session.set_subject(cfg.subject.clone());

        let ui_state_path = cfg.ui_state_path();
        if let Ok(state) = persistence::load_state_from_path(&ui_state_path) {
            if !state.subject.is_empty() {
                session.set_subject(state.subject);
            }
            session.set_category(&state.category);
        }
        let subject_buf = session.subject().to_string();

        Self {
            rx,
            session,
            ledger,
            current_frame: None,
            texture: None,
            texture_dirty: false,
            device_error: None,
            subject_buf,
            known_length_input: String::new(),
            status: "Ready".to_string(),
            live_readout: None,
            last_committed: None,
            controller: cfg.session_controller.clone(),
            reconnect: cfg.reconnect.clone(),
            ui_state_path,
            calibration_display_decimals: cfg.calibration_display_decimals,
            last_published: None,
        }
    }

    /// The frame currently rendered, if any arrived yet.
    pub fn current_frame(&self) -> Option<&Arc<Frame>> {
        self.current_frame.as_ref()
    }

    /// The current operator-visible status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
    }

    pub(crate) fn save_ui_state(&self) {
        let state = UiStateSerde {
            subject: self.session.subject().to_string(),
            category: self.session.category().to_string(),
        };
        if let Err(e) = persistence::save_state_to_path(&state, &self.ui_state_path) {
            eprintln!("Failed to save UI state: {e}");
        }
    }
}
