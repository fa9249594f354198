//! Top-level entry point for running LiveMeasure as a native window.
//!
//! [`run_livemeasure`] accepts a frame channel receiver and a configuration
//! object, builds the panel and enters the eframe event loop. The call
//! blocks until the window is closed.

use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::config::LiveMeasureConfig;
use crate::sink::FrameCommand;

use super::{MeasureApp, MeasurePanel};

/// Launch the measurement application in a native window.
pub fn run_livemeasure(
    rx: Receiver<FrameCommand>,
    mut cfg: LiveMeasureConfig,
) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    // Default to a window tall enough for a 4:3 feed plus the controls row.
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1320.0, 1020.0));
    }

    let panel = MeasurePanel::new(rx, &cfg);

    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(MeasureApp::new(panel)))
        }),
    )
}
