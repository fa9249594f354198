//! LiveMeasure crate root: re-exports and module wiring.
//!
//! This crate provides a live-feed measurement UI built on egui/eframe: an
//! operator calibrates on-screen pixel distances against a known physical
//! length once, then drags measurement lines over the feed and records
//! named, categorized measurements to a CSV log with a snapshot image per
//! measurement.
//!
//! Module map:
//! - `geometry`: display-to-native coordinate mapping and signed distances
//! - `calibration`: the persisted calibration factor (inches per pixel)
//! - `session`: the interaction state machine (modes, drags, prompts)
//! - `ledger`: sequence numbering, CSV log and snapshot store
//! - `frame`/`sink`: frame type and the channel producers feed it through
//! - `synth`: synthetic test-pattern producer (no hardware required)
//! - `camera`: local video device backend (feature `camera`)
//! - `controllers`/`config`/`persistence`: external control, configuration
//!   and UI-state persistence
//! - `app`: the egui/eframe panel, prompts and run entry point

pub mod app;
pub mod calibration;
#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod controllers;
pub mod frame;
pub mod geometry;
pub mod ledger;
pub mod persistence;
pub mod session;
pub mod sink;
pub mod synth;

// Public re-exports for a compact external API
pub use app::{run_livemeasure, MeasureApp, MeasurePanel};
pub use calibration::{CalibrationError, CalibrationStore};
pub use config::LiveMeasureConfig;
pub use controllers::{SessionController, SessionRequest, SessionStatus};
pub use frame::Frame;
pub use geometry::{signed_distance, to_native, DisplayPoint, NativePoint, SurfaceSize};
pub use ledger::{LedgerError, MeasurementLedger, MeasurementRecord};
pub use session::{MeasurementSession, Mode, PendingMeasurement, Prompt, SessionError};
pub use sink::{channel_frames, FrameCommand, FrameSink};
