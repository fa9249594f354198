//! Confirmation prompts: known-length entry after a calibration gesture and
//! save confirmation after a measurement gesture.
//!
//! Both are modal egui windows over the feed. The windows only collect an
//! action; all state transitions go through
//! [`MeasurementSession`](crate::session::MeasurementSession) so the
//! transition table stays in one place.

use eframe::egui;

use crate::session::Prompt;

use super::MeasurePanel;

enum PromptAction {
    None,
    ConfirmCalibration,
    ConfirmSave,
    Cancel,
}

impl MeasurePanel {
    pub(super) fn show_prompts(&mut self, ctx: &egui::Context) {
        // Snapshot the prompt first so the windows can borrow `self` mutably.
        let prompt = match self.session.prompt() {
            None => return,
            Some(prompt) => prompt.clone(),
        };
        let action = match prompt {
            Prompt::KnownLength { pixel_distance } => self.known_length_window(ctx, pixel_distance),
            Prompt::ConfirmSave(pending) => self.confirm_save_window(ctx, &pending),
        };

        match action {
            PromptAction::None => {}
            PromptAction::ConfirmCalibration => self.apply_known_length(),
            PromptAction::ConfirmSave => {
                match self.session.confirm_save(&mut self.ledger) {
                    Ok(record) => {
                        self.last_committed = Some((
                            record.subject.clone(),
                            record.category.clone(),
                            record.sequence_number,
                            record.length_in,
                        ));
                        self.set_status(format!(
                            "Saved measurement {} for {} ({}): {:.3} in",
                            record.sequence_number,
                            record.subject,
                            record.category,
                            record.length_in
                        ));
                    }
                    Err(e) => self.set_status(e.to_string()),
                }
            }
            PromptAction::Cancel => {
                self.session.cancel_prompt();
                self.set_status("Cancelled");
            }
        }
    }

    fn known_length_window(&mut self, ctx: &egui::Context, pixel_distance: f64) -> PromptAction {
        let mut action = PromptAction::None;
        egui::Window::new("Calibration")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Reference gesture: {:.1} px", pixel_distance.abs()));
                ui.horizontal(|ui| {
                    ui.label("Known length (in):");
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.known_length_input)
                            .desired_width(80.0),
                    );
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = PromptAction::ConfirmCalibration;
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        action = PromptAction::ConfirmCalibration;
                    }
                    if ui.button("Cancel").clicked() {
                        action = PromptAction::Cancel;
                    }
                });
            });
        action
    }

    /// Parse and apply the entered known length. Non-numeric or rejected
    /// input keeps the prompt open (and the mode `Calibrating`) so the
    /// operator can correct it.
    fn apply_known_length(&mut self) {
        let Ok(known_length) = self.known_length_input.trim().parse::<f64>() else {
            self.set_status("Invalid calibration value");
            return;
        };
        match self.session.confirm_calibration(known_length) {
            Ok(factor) => {
                self.known_length_input.clear();
                self.set_status(format!(
                    "Calibrated: {factor:.prec$} in/px",
                    prec = self.calibration_display_decimals
                ));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn confirm_save_window(
        &mut self,
        ctx: &egui::Context,
        pending: &crate::session::PendingMeasurement,
    ) -> PromptAction {
        let mut action = PromptAction::None;
        let sequence_number = self
            .ledger
            .next_sequence_number(&pending.subject, &pending.category);
        egui::Window::new("Confirm Save")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Save measurement?");
                egui::Grid::new("livemeasure_confirm_grid").show(ui, |ui| {
                    ui.label("Subject:");
                    ui.label(&pending.subject);
                    ui.end_row();
                    ui.label("Category:");
                    ui.label(&pending.category);
                    ui.end_row();
                    ui.label("Number:");
                    ui.label(sequence_number.to_string());
                    ui.end_row();
                    ui.label("Length:");
                    ui.label(format!("{:.3} in", pending.length_in));
                    ui.end_row();
                });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        action = PromptAction::ConfirmSave;
                    }
                    if ui.button("Cancel").clicked() {
                        action = PromptAction::Cancel;
                    }
                });
            });
        action
    }
}
