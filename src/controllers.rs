//! Controller for interacting with the measurement UI from external code.
//!
//! The controller exposes lightweight state and a subscription mechanism so
//! non-UI code (embedding applications, integration tests) can push simple
//! requests (switch mode, set the subject, ask for a device reconnect)
//! and observe session status updates.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::session::Mode;

/// Requests queued by external code and applied by the UI once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRequest {
    BeginCalibration,
    BeginMeasurement,
    SetSubject(String),
    SetCategory(String),
    ReconnectDevice,
}

/// Snapshot of session state published to subscribers after each change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub mode: Mode,
    /// Current calibration factor (inches per pixel), if set.
    pub calibration_factor: Option<f64>,
    /// Whether the feed is live (no outstanding device error).
    pub device_ok: bool,
    /// `(subject, category, sequence_number, length_in)` of the most
    /// recently committed record this run, if any.
    pub last_committed: Option<(String, String, u32, f64)>,
}

pub(crate) struct SessionCtrlInner {
    pub(crate) requests: Vec<SessionRequest>,
    pub(crate) listeners: Vec<Sender<SessionStatus>>,
    pub(crate) last_status: Option<SessionStatus>,
}

/// Controller to drive the session and subscribe to status updates.
#[derive(Clone)]
pub struct SessionController {
    pub(crate) inner: Arc<Mutex<SessionCtrlInner>>, // crate-visible for UI
}

impl SessionController {
    /// Create a fresh controller.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionCtrlInner {
                requests: Vec::new(),
                listeners: Vec::new(),
                last_status: None,
            })),
        }
    }

    pub fn begin_calibration(&self) {
        self.push(SessionRequest::BeginCalibration);
    }

    pub fn begin_measurement(&self) {
        self.push(SessionRequest::BeginMeasurement);
    }

    pub fn set_subject<S: Into<String>>(&self, subject: S) {
        self.push(SessionRequest::SetSubject(subject.into()));
    }

    pub fn set_category<S: Into<String>>(&self, category: S) {
        self.push(SessionRequest::SetCategory(category.into()));
    }

    /// Request an explicit device reconnect after a `DeviceError`.
    pub fn reconnect_device(&self) {
        self.push(SessionRequest::ReconnectDevice);
    }

    /// The most recently published status, if the UI has run at least once.
    pub fn last_status(&self) -> Option<SessionStatus> {
        self.inner.lock().unwrap().last_status.clone()
    }

    /// Subscribe to status updates. The returned receiver gets a
    /// [`SessionStatus`] whenever the UI publishes one.
    pub fn subscribe(&self) -> Receiver<SessionStatus> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.listeners.push(tx);
        rx
    }

    fn push(&self, req: SessionRequest) {
        self.inner.lock().unwrap().requests.push(req);
    }

    /// Drain pending requests (UI side, once per frame).
    pub(crate) fn take_requests(&self) -> Vec<SessionRequest> {
        std::mem::take(&mut self.inner.lock().unwrap().requests)
    }

    /// Publish a status snapshot to all live subscribers (UI side).
    pub(crate) fn publish(&self, status: SessionStatus) {
        let mut inner = self.inner.lock().unwrap();
        inner.last_status = Some(status.clone());
        inner.listeners.retain(|tx| tx.send(status.clone()).is_ok());
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
