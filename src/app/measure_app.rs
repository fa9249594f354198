//! Standalone application wrapper.
//!
//! [`MeasureApp`] wraps a [`MeasurePanel`] and implements [`eframe::App`]
//! so LiveMeasure can run as a native window. Embedders that host the
//! panel inside a larger egui application use [`MeasurePanel`] directly.

use std::time::Duration;

use eframe::egui;

use super::MeasurePanel;

pub struct MeasureApp {
    /// The inner panel widget that owns all data and UI state.
    pub panel: MeasurePanel,
}

impl MeasureApp {
    pub fn new(panel: MeasurePanel) -> Self {
        Self { panel }
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.panel.update(ui);
        });
        // The acquisition tick delivers frames a few tens of milliseconds
        // apart; keep repainting at that cadence even without input events.
        ctx.request_repaint_after(Duration::from_millis(33));
    }
}
