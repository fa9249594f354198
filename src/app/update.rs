//! Per-frame update logic for [`MeasurePanel`].
//!
//! [`MeasurePanel::update`] is the top-level entry point called every egui
//! frame. It applies queued controller requests, drains the frame channel,
//! renders the controls row, the live-feed surface and the status line,
//! and finally shows any pending confirmation prompt.

use eframe::egui;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CROSSHAIR, RULER};

use crate::controllers::{SessionRequest, SessionStatus};
use crate::sink::FrameCommand;

use super::MeasurePanel;

impl MeasurePanel {
    /// Main per-frame update. Call from an egui `Ui` context each frame; in
    /// standalone mode [`MeasureApp`](super::MeasureApp) does this.
    pub fn update(&mut self, ui: &mut egui::Ui) {
        self.apply_controller_requests();
        self.ingest_frames();

        self.controls_row(ui);

        // Reserve one line at the bottom for the status, feed takes the rest.
        let status_height = ui.text_style_height(&egui::TextStyle::Body) + 8.0;
        let mut feed_size = ui.available_size();
        feed_size.y = (feed_size.y - status_height).max(0.0);
        self.feed_surface(ui, feed_size);

        self.status_line(ui);
        self.show_prompts(ui.ctx());
        self.publish_status();
    }

    /// Drain the acquisition channel. The newest frame replaces the display
    /// frame unless the session holds the frame latch: while a gesture or a
    /// pending confirmation is open the displayed instant stays fixed and
    /// newer acquisitions are dropped (ticks tolerate being skipped).
    fn ingest_frames(&mut self) {
        while let Ok(cmd) = self.rx.try_recv() {
            match cmd {
                FrameCommand::Frame(frame) => {
                    if self.session.holds_frame() {
                        continue;
                    }
                    self.current_frame = Some(frame.into_shared());
                    self.texture_dirty = true;
                    if self.device_error.take().is_some() {
                        self.status = "Feed restored".to_string();
                    }
                }
                FrameCommand::DeviceError(msg) => {
                    eprintln!("Acquisition device error: {msg}");
                    self.device_error = Some(msg);
                }
            }
        }
    }

    /// Apply requests queued through the [`SessionController`](crate::controllers::SessionController).
    fn apply_controller_requests(&mut self) {
        let Some(ctrl) = self.controller.clone() else {
            return;
        };
        for req in ctrl.take_requests() {
            match req {
                SessionRequest::BeginCalibration => self.start_calibration(),
                SessionRequest::BeginMeasurement => self.start_measurement(),
                SessionRequest::SetSubject(subject) => {
                    self.subject_buf = subject.clone();
                    self.session.set_subject(subject);
                    self.save_ui_state();
                }
                SessionRequest::SetCategory(category) => {
                    if self.session.set_category(&category) {
                        self.save_ui_state();
                    } else {
                        self.set_status(format!("Unknown category: {category}"));
                    }
                }
                SessionRequest::ReconnectDevice => self.request_reconnect(),
            }
        }
    }

    fn controls_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Subject:");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.subject_buf).desired_width(140.0),
            );
            if resp.changed() {
                self.session.set_subject(self.subject_buf.clone());
            }
            if resp.lost_focus() {
                self.save_ui_state();
            }

            ui.label("Category:");
            let categories: Vec<String> = self.session.categories().to_vec();
            let mut selected = self.session.category().to_string();
            let before = selected.clone();
            egui::ComboBox::from_id_salt("livemeasure_category")
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for c in &categories {
                        ui.selectable_value(&mut selected, c.clone(), c);
                    }
                });
            if selected != before {
                self.session.set_category(&selected);
                self.save_ui_state();
            }

            ui.separator();
            if ui.button(format!("{RULER} Calibrate")).clicked() {
                self.start_calibration();
            }
            if ui.button(format!("{CROSSHAIR} Measure")).clicked() {
                self.start_measurement();
            }

            ui.separator();
            ui.label(self.calibration_label());

            if self.device_error.is_some() && self.reconnect.is_some() {
                ui.separator();
                if ui.button(format!("{ARROWS_CLOCKWISE} Reconnect")).clicked() {
                    self.request_reconnect();
                }
            }
        });
    }

    fn status_line(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(err) = &self.device_error {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("No feed: {err}"));
                ui.separator();
            }
            let text = match self.live_readout {
                Some(readout) => match readout.inches {
                    Some(inches) => format!("Current measurement: {inches:.4} in"),
                    None => format!("Current pixels: {:.1}", readout.pixels),
                },
                None => self.status.clone(),
            };
            ui.label(text);
        });
    }

    pub(super) fn start_calibration(&mut self) {
        self.session.begin_calibration();
        self.live_readout = None;
        self.set_status("Click and drag over a known length to calibrate");
    }

    pub(super) fn start_measurement(&mut self) {
        self.live_readout = None;
        match self.session.begin_measurement() {
            Ok(()) => self.set_status("Click and drag to measure"),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn request_reconnect(&mut self) {
        if let Some(reconnect) = &self.reconnect {
            reconnect();
            self.set_status("Reconnecting to device...");
        }
    }

    fn calibration_label(&self) -> String {
        match self.session.calibration_factor() {
            Some(factor) => format!(
                "Calibration: {factor:.prec$} in/px",
                prec = self.calibration_display_decimals
            ),
            None => "Calibration: not set".to_string(),
        }
    }

    /// Publish a status snapshot to controller subscribers when it changed.
    fn publish_status(&mut self) {
        let Some(ctrl) = &self.controller else {
            return;
        };
        let status = SessionStatus {
            mode: self.session.mode(),
            calibration_factor: self.session.calibration_factor(),
            device_ok: self.device_error.is_none(),
            last_committed: self.last_committed.clone(),
        };
        if self.last_published.as_ref() != Some(&status) {
            ctrl.publish(status.clone());
            self.last_published = Some(status);
        }
    }
}
