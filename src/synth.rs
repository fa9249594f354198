//! Synthetic test-pattern producer.
//!
//! Stands in for the acquisition device when no camera backend is compiled
//! in: a background thread pushes a slowly moving grid pattern into the
//! [`FrameSink`] at roughly 30 fps. Useful for demos and for exercising the
//! full interaction path without hardware.

use std::time::Duration;

use crate::frame::Frame;
use crate::sink::FrameSink;

/// Spawn a thread producing `width`x`height` test frames until the
/// receiving end of the sink is dropped.
pub fn spawn_test_pattern(width: u32, height: u32, sink: FrameSink) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut tick: u64 = 0;
        loop {
            let frame = render_test_pattern(width, height, tick);
            if !sink.send_frame(frame) {
                return;
            }
            tick += 1;
            std::thread::sleep(Duration::from_millis(33));
        }
    })
}

/// One frame of the pattern: a dark field with a 100-pixel grid and a
/// sweeping highlight column. The fixed grid pitch doubles as a visual
/// calibration reference.
pub fn render_test_pattern(width: u32, height: u32, tick: u64) -> Frame {
    let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
    let sweep = (tick * 4 % width.max(1) as u64) as u32;
    for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            let on_grid = x % 100 == 0 || y % 100 == 0;
            let (r, g, b) = if x == sweep {
                (90, 160, 90)
            } else if on_grid {
                (70, 70, 90)
            } else {
                (24, 24, 28)
            };
            pixels[i] = r;
            pixels[i + 1] = g;
            pixels[i + 2] = b;
            pixels[i + 3] = 255;
        }
    }
    Frame::from_rgba(width, height, pixels)
}
