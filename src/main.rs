use livemeasure::{channel_frames, run_livemeasure, LiveMeasureConfig};

/// Default capture device index when built with the `camera` feature.
#[cfg(feature = "camera")]
const CAMERA_INDEX: u32 = 0;

fn main() -> eframe::Result<()> {
    let (sink, rx) = channel_frames();
    #[cfg_attr(not(feature = "camera"), allow(unused_mut))]
    let mut cfg = LiveMeasureConfig::default();

    #[cfg(feature = "camera")]
    let _camera = {
        let handle = std::sync::Arc::new(livemeasure::camera::spawn_camera(CAMERA_INDEX, sink));
        let reconnect = std::sync::Arc::clone(&handle);
        cfg.reconnect = Some(std::sync::Arc::new(move || reconnect.reconnect()));
        handle
    };

    // Without a camera backend, feed a synthetic test pattern so the whole
    // calibrate/measure path can be exercised.
    #[cfg(not(feature = "camera"))]
    let _synth = livemeasure::synth::spawn_test_pattern(1280, 960, sink);

    run_livemeasure(rx, cfg)
}
