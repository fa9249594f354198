use livemeasure::frame::Frame;
use livemeasure::sink::{channel_frames, FrameCommand};
use livemeasure::synth::{render_test_pattern, spawn_test_pattern};

#[test]
fn commands_arrive_in_send_order() {
    let (sink, rx) = channel_frames();
    assert!(sink.send_rgba(2, 2, vec![1u8; 16]));
    sink.device_error("unplugged");
    assert!(sink.send_frame(Frame::from_rgba(1, 1, vec![9, 9, 9, 255])));

    match rx.recv().unwrap() {
        FrameCommand::Frame(f) => assert_eq!(f.size(), (2, 2)),
        FrameCommand::DeviceError(_) => panic!("frame expected first"),
    }
    match rx.recv().unwrap() {
        FrameCommand::DeviceError(msg) => assert_eq!(msg, "unplugged"),
        FrameCommand::Frame(_) => panic!("device error expected second"),
    }
    match rx.recv().unwrap() {
        FrameCommand::Frame(f) => assert_eq!(f.size(), (1, 1)),
        FrameCommand::DeviceError(_) => panic!("frame expected last"),
    }
}

#[test]
fn cloned_sinks_feed_the_same_receiver() {
    let (sink, rx) = channel_frames();
    let other = sink.clone();
    assert!(sink.send_rgba(1, 1, vec![0, 0, 0, 255]));
    assert!(other.send_rgba(1, 1, vec![255, 255, 255, 255]));
    assert_eq!(rx.iter().take(2).count(), 2);
}

#[test]
fn send_reports_closure_after_receiver_drops() {
    let (sink, rx) = channel_frames();
    drop(rx);
    assert!(!sink.send_rgba(1, 1, vec![0, 0, 0, 255]));
}

#[test]
fn test_pattern_thread_delivers_frames_and_stops_on_drop() {
    let (sink, rx) = channel_frames();
    let handle = spawn_test_pattern(64, 48, sink);

    for _ in 0..3 {
        match rx.recv().unwrap() {
            FrameCommand::Frame(f) => assert_eq!(f.size(), (64, 48)),
            FrameCommand::DeviceError(e) => panic!("unexpected device error: {e}"),
        }
    }

    drop(rx);
    handle.join().unwrap();
}

#[test]
fn test_pattern_is_deterministic_and_opaque() {
    let a = render_test_pattern(120, 80, 7);
    let b = render_test_pattern(120, 80, 7);
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.size(), (120, 80));
    assert!(a.pixels().chunks_exact(4).all(|px| px[3] == 255));

    // The sweep column moves with the tick.
    let c = render_test_pattern(120, 80, 8);
    assert_ne!(a.pixels(), c.pixels());
}
