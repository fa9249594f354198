//! Acquisition channel: producers feed frames into the UI.
//!
//! Any code (a camera backend, a file player, a synthetic pattern thread)
//! can act as the acquisition device by pushing [`FrameCommand`]s through a
//! [`FrameSink`]. The UI drains the channel once per update tick; frame
//! production never blocks interaction handling and vice versa.

use std::sync::mpsc::{Receiver, Sender};

use crate::frame::Frame;

/// Messages sent over the channel to drive the feed.
pub enum FrameCommand {
    /// A new native-resolution frame.
    Frame(Frame),
    /// The device became unavailable. The UI enters a "no feed" state and
    /// keeps the core usable; acquisition resumes only on explicit
    /// reconnect.
    DeviceError(String),
}

/// Cloneable sender handle for feeding frames into the measurement UI.
#[derive(Clone)]
pub struct FrameSink {
    tx: Sender<FrameCommand>,
}

impl FrameSink {
    /// Push a completed frame. Errors (UI gone) are ignored; a producer
    /// thread discovers shutdown through the closed channel on a later call.
    pub fn send_frame(&self, frame: Frame) -> bool {
        self.tx.send(FrameCommand::Frame(frame)).is_ok()
    }

    /// Convenience: push raw RGBA8 bytes as a frame.
    pub fn send_rgba(&self, width: u32, height: u32, pixels: Vec<u8>) -> bool {
        self.send_frame(Frame::from_rgba(width, height, pixels))
    }

    /// Report that the device is unavailable.
    pub fn device_error<S: Into<String>>(&self, message: S) {
        let _ = self.tx.send(FrameCommand::DeviceError(message.into()));
    }
}

/// Create a frame channel: the sink goes to the producer, the receiver to
/// [`run_livemeasure`](crate::app::run_livemeasure) or an embedded panel.
pub fn channel_frames() -> (FrameSink, Receiver<FrameCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (FrameSink { tx }, rx)
}
