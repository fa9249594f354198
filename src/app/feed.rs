//! The live-feed surface: texture upload, pointer gestures and the
//! measurement line overlay.
//!
//! The feed is rendered aspect-fit inside the allocated area. Pointer
//! events over the rendered image become the session's pointer commands,
//! expressed in display coordinates relative to the image rect, with the
//! rect's size as the display surface size; the mapping back to native
//! pixels lives in [`geometry`](crate::geometry), not here.

use eframe::egui;

use crate::geometry::{self, DisplayPoint, SurfaceSize};

use super::MeasurePanel;

impl MeasurePanel {
    pub(super) fn feed_surface(&mut self, ui: &mut egui::Ui, size: egui::Vec2) {
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(12));

        let frame = match self.session.held_frame().or(self.current_frame.as_ref()) {
            Some(frame) => frame.clone(),
            None => {
                let msg = if self.device_error.is_some() {
                    "No feed — device unavailable"
                } else {
                    "Waiting for feed..."
                };
                painter.text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    msg,
                    egui::TextStyle::Heading.resolve(ui.style()),
                    egui::Color32::GRAY,
                );
                return;
            }
        };

        self.upload_texture(ui.ctx(), &frame);
        let rect = fitted_rect(response.rect, frame.size());
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        self.handle_pointer(&response, rect);
        self.draw_measurement_line(&painter, rect, frame.size());
    }

    fn upload_texture(&mut self, ctx: &egui::Context, frame: &crate::frame::Frame) {
        if !self.texture_dirty && self.texture.is_some() {
            return;
        }
        let img = frame.to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(img, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("livemeasure_feed", img, egui::TextureOptions::LINEAR))
            }
        }
        self.texture_dirty = false;
    }

    /// Translate egui drag interactions into the session's pointer commands.
    fn handle_pointer(&mut self, response: &egui::Response, rect: egui::Rect) {
        let surface = SurfaceSize::new(rect.width(), rect.height());
        let display_at = |pos: egui::Pos2| DisplayPoint::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                if rect.contains(pos) {
                    let frame = self
                        .session
                        .held_frame()
                        .or(self.current_frame.as_ref())
                        .cloned();
                    if let Some(frame) = frame {
                        self.session.pointer_down(display_at(pos), surface, &frame);
                    }
                }
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let clamped = pos.clamp(rect.min, rect.max);
                self.live_readout = self.session.pointer_move(display_at(clamped), surface);
            }
        } else if response.drag_stopped() {
            self.live_readout = None;
            if let Err(e) = self.session.pointer_up() {
                self.set_status(e.to_string());
            }
        }
    }

    /// Paint the in-progress gesture over the feed.
    fn draw_measurement_line(&self, painter: &egui::Painter, rect: egui::Rect, native: (u32, u32)) {
        let Some((start, current)) = self.session.drag_points() else {
            return;
        };
        let surface = SurfaceSize::new(rect.width(), rect.height());
        let at = |p| {
            let d = geometry::to_display(p, surface, native);
            egui::pos2(rect.min.x + d.x, rect.min.y + d.y)
        };
        let stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 64, 64));
        painter.line_segment([at(start), at(current)], stroke);
        painter.circle_filled(at(start), 3.0, stroke.color);
        painter.circle_filled(at(current), 3.0, stroke.color);
    }
}

/// Largest rect with the frame's aspect ratio centered inside `outer`.
fn fitted_rect(outer: egui::Rect, native: (u32, u32)) -> egui::Rect {
    let (nw, nh) = (native.0.max(1) as f32, native.1.max(1) as f32);
    let scale = (outer.width() / nw).min(outer.height() / nh);
    let size = egui::vec2(nw * scale, nh * scale);
    egui::Rect::from_center_size(outer.center(), size)
}
