use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use livemeasure::calibration::{load_factor, CalibrationError, CalibrationStore};

fn temp_path(tag: &str) -> PathBuf {
    static N: AtomicU32 = AtomicU32::new(0);
    let mut p = std::env::temp_dir();
    p.push(format!(
        "livemeasure_cal_{tag}_{}_{}",
        std::process::id(),
        N.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&p).unwrap();
    p.push("calibration.txt");
    p
}

#[test]
fn missing_file_means_unset() {
    let store = CalibrationStore::open(temp_path("missing"));
    assert!(!store.is_set());
    assert_eq!(store.get(), None);
}

#[test]
fn garbage_content_degrades_to_unset() {
    let path = temp_path("garbage");
    std::fs::write(&path, "not a number").unwrap();
    assert_eq!(load_factor(&path), None);
    assert!(!CalibrationStore::open(path).is_set());
}

#[test]
fn non_positive_content_degrades_to_unset() {
    let path = temp_path("nonpositive");
    std::fs::write(&path, "-0.5").unwrap();
    assert!(!CalibrationStore::open(path).is_set());
}

#[test]
fn set_computes_and_persists_factor() {
    let path = temp_path("roundtrip");
    let mut store = CalibrationStore::open(path.clone());
    let factor = store.set(2.0, 100.0).unwrap();
    assert!((factor - 0.02).abs() < 1e-12);
    assert_eq!(store.get(), Some(factor));

    // Reload from disk: exact decimal round-trip.
    let reloaded = CalibrationStore::open(path);
    assert_eq!(reloaded.get(), Some(factor));
}

#[test]
fn gesture_direction_does_not_flip_the_factor() {
    let mut store = CalibrationStore::open(temp_path("signed"));
    // A right-to-left reference gesture yields a negative signed distance;
    // the stored factor is computed from the magnitude.
    let factor = store.set(2.0, -100.0).unwrap();
    assert!(factor > 0.0);
    assert!((factor - 0.02).abs() < 1e-12);
}

#[test]
fn zero_pixel_distance_is_rejected_and_keeps_previous_factor() {
    let path = temp_path("zero");
    let mut store = CalibrationStore::open(path.clone());
    store.set(2.0, 100.0).unwrap();

    let err = store.set(2.0, 0.0).unwrap_err();
    assert!(matches!(err, CalibrationError::Invalid { .. }));
    assert_eq!(store.get(), Some(0.02));
    assert_eq!(load_factor(&path), Some(0.02));
}

#[test]
fn non_positive_known_length_is_rejected() {
    let mut store = CalibrationStore::open(temp_path("badlen"));
    assert!(matches!(
        store.set(0.0, 50.0),
        Err(CalibrationError::Invalid { .. })
    ));
    assert!(matches!(
        store.set(-1.0, 50.0),
        Err(CalibrationError::Invalid { .. })
    ));
    assert!(matches!(
        store.set(f64::NAN, 50.0),
        Err(CalibrationError::Invalid { .. })
    ));
    assert!(!store.is_set());
}

#[test]
fn clear_removes_file_and_value() {
    let path = temp_path("clear");
    let mut store = CalibrationStore::open(path.clone());
    store.set(1.0, 10.0).unwrap();
    assert!(path.exists());

    store.clear().unwrap();
    assert!(!store.is_set());
    assert!(!path.exists());
    // Clearing again is not an error.
    store.clear().unwrap();
}
