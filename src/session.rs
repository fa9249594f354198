//! The measurement interaction state machine.
//!
//! [`MeasurementSession`] owns only domain state: the active mode, the
//! in-progress drag, the held-frame latch and the pending confirmation
//! prompt. The display layer is a pure event source that feeds it the four
//! explicit commands (begin-calibration, begin-measurement,
//! pointer-down/move/up, confirm/cancel) and renders whatever the session
//! reports back. Prompts are modeled as data handed to an external
//! collaborator, not as callbacks, which keeps the transition table total
//! and testable without a display surface.

use std::fmt;
use std::sync::Arc;

use crate::calibration::{CalibrationError, CalibrationStore};
use crate::frame::Frame;
use crate::geometry::{self, DisplayPoint, NativePoint, SurfaceSize};
use crate::ledger::{LedgerError, MeasurementLedger, MeasurementRecord};

/// Interaction mode. Exactly one is active; `Idle` only exists before the
/// first mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Calibrating,
    Measuring,
}

/// Operator-visible, non-fatal session errors.
#[derive(Debug)]
pub enum SessionError {
    /// Measurement requested without a set calibration factor.
    CalibrationRequired,
    /// Measurement completed without a subject identifier configured.
    SubjectRequired,
    /// The entered known length (or the reference gesture) was unusable.
    InvalidCalibration(CalibrationError),
    /// Confirm/cancel arrived with no prompt outstanding.
    NoPrompt,
    /// Committing the confirmed measurement failed.
    Ledger(LedgerError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::CalibrationRequired => write!(f, "please calibrate first"),
            SessionError::SubjectRequired => write!(f, "please enter a subject"),
            SessionError::InvalidCalibration(e) => write!(f, "{e}"),
            SessionError::NoPrompt => write!(f, "no confirmation pending"),
            SessionError::Ledger(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<LedgerError> for SessionError {
    fn from(e: LedgerError) -> Self {
        SessionError::Ledger(e)
    }
}

/// The in-progress pointer gesture, in native coordinates.
#[derive(Debug, Clone, Copy)]
struct Drag {
    start: NativePoint,
    current: NativePoint,
}

/// A measurement awaiting the operator's save confirmation.
#[derive(Debug, Clone)]
pub struct PendingMeasurement {
    pub subject: String,
    pub category: String,
    /// Signed physical length (pixel distance x calibration factor).
    pub length_in: f64,
    pub pixel_distance: f64,
    /// The frame latched at pointer-down; becomes the snapshot on commit.
    pub frame: Arc<Frame>,
}

/// Confirmation currently handed to the prompt collaborator.
#[derive(Debug, Clone)]
pub enum Prompt {
    /// Calibration gesture finished; ask for the known physical length.
    KnownLength { pixel_distance: f64 },
    /// Measurement gesture finished; ask whether to save it.
    ConfirmSave(PendingMeasurement),
}

/// Live projection of the current drag, reported on every pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveReadout {
    /// Signed pixel distance of the drag so far.
    pub pixels: f64,
    /// Signed physical length, present when measuring with a set factor.
    pub inches: Option<f64>,
}

pub struct MeasurementSession {
    mode: Mode,
    drag: Option<Drag>,
    held_frame: Option<Arc<Frame>>,
    prompt: Option<Prompt>,
    subject: String,
    category: String,
    categories: Vec<String>,
    calibration: CalibrationStore,
}

impl MeasurementSession {
    /// Create a session in `Idle` with the given calibration store and the
    /// closed category set. The first configured category is preselected.
    pub fn new(calibration: CalibrationStore, categories: Vec<String>) -> Self {
        let category = categories.first().cloned().unwrap_or_default();
        Self {
            mode: Mode::Idle,
            drag: None,
            held_frame: None,
            prompt: None,
            subject: String::new(),
            category,
            categories,
            calibration,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn calibration_factor(&self) -> Option<f64> {
        self.calibration.get()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_set()
    }

    pub fn calibration_store(&self) -> &CalibrationStore {
        &self.calibration
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_subject<S: Into<String>>(&mut self, subject: S) {
        self.subject = subject.into();
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Select a category. Labels outside the configured closed set are
    /// ignored and the previous selection is kept.
    pub fn set_category(&mut self, category: &str) -> bool {
        if self.categories.iter().any(|c| c == category) {
            self.category = category.to_string();
            true
        } else {
            false
        }
    }

    /// Enter calibration mode. Always allowed; any in-progress gesture or
    /// pending confirmation is cleanly aborted.
    pub fn begin_calibration(&mut self) {
        self.abort_gesture();
        self.mode = Mode::Calibrating;
    }

    /// Enter measurement mode. Fails with [`SessionError::CalibrationRequired`]
    /// when no factor is set; the mode is unchanged on failure.
    pub fn begin_measurement(&mut self) -> Result<(), SessionError> {
        if !self.calibration.is_set() {
            return Err(SessionError::CalibrationRequired);
        }
        self.abort_gesture();
        self.mode = Mode::Measuring;
        Ok(())
    }

    /// Pointer pressed over the display surface.
    ///
    /// In `Calibrating` or `Measuring` this latches the given frame for the
    /// whole gesture and fixes the drag start point. Ignored in `Idle`, and
    /// ignored while a drag or a pending confirmation is already open: no
    /// two gestures may be concurrently active.
    pub fn pointer_down(&mut self, display: DisplayPoint, surface: SurfaceSize, frame: &Arc<Frame>) {
        if self.mode == Mode::Idle || self.drag.is_some() || self.prompt.is_some() {
            return;
        }
        let p = geometry::to_native(display, surface, frame.size());
        self.held_frame = Some(Arc::clone(frame));
        self.drag = Some(Drag {
            start: p,
            current: p,
        });
    }

    /// Pointer moved while dragging: update the current endpoint and report
    /// the live projection. Not a state transition; `None` when no drag is
    /// open.
    pub fn pointer_move(&mut self, display: DisplayPoint, surface: SurfaceSize) -> Option<LiveReadout> {
        let native_size = self.held_frame.as_ref()?.size();
        let drag = self.drag.as_mut()?;
        drag.current = geometry::to_native(display, surface, native_size);
        let pixels = geometry::signed_distance(drag.start, drag.current);
        let inches = match (self.mode, self.calibration.get()) {
            (Mode::Measuring, Some(factor)) => Some(pixels * factor),
            _ => None,
        };
        Some(LiveReadout { pixels, inches })
    }

    /// Pointer released: resolve the drag into a confirmation prompt.
    ///
    /// * `Calibrating`: a [`Prompt::KnownLength`] is opened; the frame
    ///   latch stays held until the prompt resolves.
    /// * `Measuring`: fails non-fatally with `CalibrationRequired` or
    ///   `SubjectRequired` (drag cleared, frame released, mode unchanged);
    ///   otherwise a [`Prompt::ConfirmSave`] carrying the pending record and
    ///   the held frame is opened.
    ///
    /// Releases with no open drag are no-ops.
    pub fn pointer_up(&mut self) -> Result<(), SessionError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        let pixels = geometry::signed_distance(drag.start, drag.current);
        match self.mode {
            Mode::Idle => Ok(()),
            Mode::Calibrating => {
                self.prompt = Some(Prompt::KnownLength {
                    pixel_distance: pixels,
                });
                Ok(())
            }
            Mode::Measuring => {
                let Some(factor) = self.calibration.get() else {
                    self.held_frame = None;
                    return Err(SessionError::CalibrationRequired);
                };
                if self.subject.is_empty() {
                    self.held_frame = None;
                    return Err(SessionError::SubjectRequired);
                }
                let frame = self
                    .held_frame
                    .clone()
                    .expect("held-frame latch must be set while a drag is open");
                self.prompt = Some(Prompt::ConfirmSave(PendingMeasurement {
                    subject: self.subject.clone(),
                    category: self.category.clone(),
                    length_in: pixels * factor,
                    pixel_distance: pixels,
                    frame,
                }));
                Ok(())
            }
        }
    }

    /// The confirmation currently awaiting the operator, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Endpoints of the open drag (native coordinates), for overlay painting.
    pub fn drag_points(&self) -> Option<(NativePoint, NativePoint)> {
        self.drag.map(|d| (d.start, d.current))
    }

    /// Whether the held-frame latch is engaged. While it is, the acquisition
    /// tick must not touch the latched frame (it may still update the
    /// display frame; `Arc` sharing keeps the latched instant intact).
    pub fn holds_frame(&self) -> bool {
        self.held_frame.is_some()
    }

    pub fn held_frame(&self) -> Option<&Arc<Frame>> {
        self.held_frame.as_ref()
    }

    /// Apply the operator's known-length answer to a pending calibration
    /// prompt. On success the factor is computed and persisted and the
    /// prompt closes; on [`SessionError::InvalidCalibration`] the prompt
    /// stays open so the value can be corrected. Mode remains `Calibrating`.
    pub fn confirm_calibration(&mut self, known_length: f64) -> Result<f64, SessionError> {
        let pixel_distance = match self.prompt {
            Some(Prompt::KnownLength { pixel_distance }) => pixel_distance,
            _ => return Err(SessionError::NoPrompt),
        };
        let factor = self
            .calibration
            .set(known_length, pixel_distance)
            .map_err(SessionError::InvalidCalibration)?;
        self.prompt = None;
        self.held_frame = None;
        Ok(factor)
    }

    /// Commit the pending measurement to the ledger. Whatever the outcome,
    /// the prompt closes and the held-frame latch is released; on a
    /// persistence failure the record is not counted toward future
    /// sequence numbers.
    pub fn confirm_save(
        &mut self,
        ledger: &mut MeasurementLedger,
    ) -> Result<MeasurementRecord, SessionError> {
        let pending = match self.prompt.take() {
            Some(Prompt::ConfirmSave(pending)) => pending,
            other => {
                self.prompt = other;
                return Err(SessionError::NoPrompt);
            }
        };
        self.held_frame = None;
        let record = ledger.commit(
            &pending.subject,
            &pending.category,
            pending.length_in,
            &pending.frame,
        )?;
        Ok(record)
    }

    /// Cancel the pending confirmation: a clean abort. Drag cleared, frame
    /// latch released, mode unchanged, nothing recorded.
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.drag = None;
        self.held_frame = None;
    }

    fn abort_gesture(&mut self) {
        self.drag = None;
        self.prompt = None;
        self.held_frame = None;
    }
}

impl fmt::Debug for MeasurementSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementSession")
            .field("mode", &self.mode)
            .field("subject", &self.subject)
            .field("category", &self.category)
            .field("dragging", &self.drag.is_some())
            .field("prompt", &self.prompt.is_some())
            .finish()
    }
}
