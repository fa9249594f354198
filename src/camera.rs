//! Local video device backend (feature `camera`).
//!
//! A capture thread opens the device via `nokhwa`, decodes frames to RGBA
//! and pushes them into the [`FrameSink`]. When the device cannot be opened
//! or the stream dies, a [`FrameCommand::DeviceError`](crate::sink::FrameCommand)
//! is reported and the thread parks until an explicit reconnect request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::sink::FrameSink;

/// Handle to a running capture thread.
pub struct CameraHandle {
    stop: Arc<AtomicBool>,
    reconnect: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl CameraHandle {
    /// Ask a parked (errored) capture thread to try opening the device again.
    pub fn reconnect(&self) {
        self.reconnect.store(true, Ordering::Relaxed);
    }

    /// Stop the capture thread and wait for it to exit.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Spawn the capture thread for device `index`, feeding `sink`.
pub fn spawn_camera(index: u32, sink: FrameSink) -> CameraHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let reconnect = Arc::new(AtomicBool::new(false));
    let join = {
        let stop = Arc::clone(&stop);
        let reconnect = Arc::clone(&reconnect);
        std::thread::spawn(move || capture_loop(index, sink, stop, reconnect))
    };
    CameraHandle {
        stop,
        reconnect,
        join: Some(join),
    }
}

fn capture_loop(index: u32, sink: FrameSink, stop: Arc<AtomicBool>, reconnect: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match stream_frames(index, &sink, &stop) {
            Ok(()) => return, // sink closed, UI is gone
            Err(e) => sink.device_error(e),
        }
        // Park until the operator asks for a reconnect.
        while !stop.load(Ordering::Relaxed) && !reconnect.swap(false, Ordering::Relaxed) {
            std::thread::sleep(Duration::from_millis(100));
        }
    }
}

/// Open the device and push frames until the sink closes (`Ok`), the stop
/// flag is set (`Ok`), or the device fails (`Err` with an operator-readable
/// message).
fn stream_frames(index: u32, sink: &FrameSink, stop: &AtomicBool) -> Result<(), String> {
    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = Camera::new(CameraIndex::Index(index), format)
        .map_err(|e| format!("could not open camera {index}: {e}"))?;
    camera
        .open_stream()
        .map_err(|e| format!("could not start camera {index} stream: {e}"))?;

    while !stop.load(Ordering::Relaxed) {
        let buffer = camera
            .frame()
            .map_err(|e| format!("camera {index} stream lost: {e}"))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| format!("camera {index} frame decode failed: {e}"))?;
        let (width, height) = (decoded.width(), decoded.height());
        let rgb = decoded.into_raw();
        let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
        for px in rgb.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        if !sink.send_rgba(width, height, rgba) {
            return Ok(());
        }
    }
    Ok(())
}
