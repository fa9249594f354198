use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use livemeasure::frame::Frame;
use livemeasure::ledger::{
    default_categories, write_record_row, LedgerError, MeasurementLedger, MeasurementRecord,
    CSV_HEADER,
};

fn temp_dir(tag: &str) -> PathBuf {
    static N: AtomicU32 = AtomicU32::new(0);
    let mut p = std::env::temp_dir();
    p.push(format!(
        "livemeasure_ledger_{tag}_{}_{}",
        std::process::id(),
        N.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn test_frame() -> Frame {
    Frame::from_rgba(4, 4, vec![128u8; 4 * 4 * 4])
}

fn open_ledger(dir: &PathBuf) -> MeasurementLedger {
    MeasurementLedger::open(
        dir.join("measurements.csv"),
        dir.join("pictures"),
        default_categories(),
        3,
    )
    .unwrap()
}

#[test]
fn sequence_numbers_are_independent_per_subject_and_category() {
    let dir = temp_dir("seq");
    let mut ledger = open_ledger(&dir);
    let frame = test_frame();

    let a1 = ledger.commit("M1", "inkframe_cal", 1.0, &frame).unwrap();
    let a2 = ledger.commit("M1", "inkframe_cal", 1.1, &frame).unwrap();
    let b1 = ledger.commit("M1", "trad_cal", 9.0, &frame).unwrap();
    let a3 = ledger.commit("M1", "inkframe_cal", 1.2, &frame).unwrap();

    assert_eq!(
        (a1.sequence_number, a2.sequence_number, a3.sequence_number),
        (1, 2, 3)
    );
    assert_eq!(b1.sequence_number, 1);

    // Different subject, same category: numbering starts over.
    let other = ledger.commit("M2", "inkframe_cal", 2.0, &frame).unwrap();
    assert_eq!(other.sequence_number, 1);
}

#[test]
fn subject_matching_is_case_sensitive() {
    let dir = temp_dir("case");
    let mut ledger = open_ledger(&dir);
    let frame = test_frame();
    ledger.commit("m1", "trad_test", 1.0, &frame).unwrap();
    assert_eq!(ledger.next_sequence_number("M1", "trad_test"), 1);
    assert_eq!(ledger.next_sequence_number("m1", "trad_test"), 2);
}

#[test]
fn commit_writes_header_once_and_appends_rows() {
    let dir = temp_dir("csv");
    let mut ledger = open_ledger(&dir);
    let frame = test_frame();
    ledger.commit("M1", "inkframe_test", 0.1234, &frame).unwrap();
    ledger.commit("M1", "inkframe_test", -2.5, &frame).unwrap();

    let txt = std::fs::read_to_string(dir.join("measurements.csv")).unwrap();
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("M1,1,0.123,inkframe_test,"));
    assert!(lines[2].starts_with("M1,2,-2.500,inkframe_test,"));
}

#[test]
fn commit_stores_one_snapshot_per_record() {
    let dir = temp_dir("snap");
    let mut ledger = open_ledger(&dir);
    let frame = test_frame();
    let rec = ledger.commit("M7", "trad_cal", 3.0, &frame).unwrap();
    let path = dir.join("pictures").join("M7").join("trad_cal").join("1.png");
    assert_eq!(rec.sequence_number, 1);
    assert!(path.exists(), "snapshot must exist at {path:?}");
}

#[test]
fn replaying_the_log_continues_numbering_across_restarts() {
    let dir = temp_dir("replay");
    {
        let mut ledger = open_ledger(&dir);
        let frame = test_frame();
        ledger.commit("M1", "inkframe_cal", 1.0, &frame).unwrap();
        ledger.commit("M1", "inkframe_cal", 1.5, &frame).unwrap();
    }
    // "Restart": a fresh ledger over the same log.
    let ledger = open_ledger(&dir);
    assert_eq!(ledger.records().len(), 2);
    assert_eq!(ledger.next_sequence_number("M1", "inkframe_cal"), 3);
    assert_eq!(ledger.next_sequence_number("M1", "trad_test"), 1);
}

#[test]
fn malformed_log_rows_are_skipped() {
    let dir = temp_dir("malformed");
    std::fs::write(
        dir.join("measurements.csv"),
        format!("{CSV_HEADER}\nM1,1,0.5,trad_cal,2026-01-01 10:00:00\nnot,a,valid,row\nM1,notanumber,0.5,trad_cal,2026-01-01 10:00:01\n"),
    )
    .unwrap();
    let ledger = open_ledger(&dir);
    assert_eq!(ledger.records().len(), 1);
    assert_eq!(ledger.next_sequence_number("M1", "trad_cal"), 2);
}

#[test]
fn unknown_category_is_rejected() {
    let dir = temp_dir("cat");
    let mut ledger = open_ledger(&dir);
    let err = ledger
        .commit("M1", "definitely_not_configured", 1.0, &test_frame())
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnknownCategory(_)));
    assert!(ledger.records().is_empty());
    assert!(!dir.join("measurements.csv").exists());
}

#[test]
fn subjects_that_would_corrupt_the_row_or_path_are_rejected() {
    let dir = temp_dir("subject");
    let mut ledger = open_ledger(&dir);
    for subject in ["", "a,b", "a/b", "a\\b"] {
        let err = ledger
            .commit(subject, "trad_cal", 1.0, &test_frame())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSubject(_)), "{subject:?}");
    }
}

#[test]
fn failed_commit_is_not_counted_and_rolls_back_the_snapshot() {
    let dir = temp_dir("atomic");
    let log = dir.join("measurements.csv");
    // Occupy the log path with a directory so the row append must fail.
    std::fs::create_dir_all(&log).unwrap();
    let mut ledger = MeasurementLedger::open(
        log.clone(),
        dir.join("pictures"),
        default_categories(),
        3,
    )
    .unwrap_or_else(|_| {
        MeasurementLedger::empty(log, dir.join("pictures"), default_categories(), 3)
    });

    let err = ledger.commit("M1", "trad_cal", 1.0, &test_frame()).unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert!(ledger.records().is_empty());
    assert_eq!(ledger.next_sequence_number("M1", "trad_cal"), 1);
    let snapshot = dir.join("pictures").join("M1").join("trad_cal").join("1.png");
    assert!(!snapshot.exists(), "snapshot must be rolled back");
}

#[test]
fn record_row_formatting() {
    let record = MeasurementRecord {
        subject: "M1".to_string(),
        sequence_number: 4,
        length_in: -1.23456,
        category: "trad_test".to_string(),
        timestamp: "2026-08-30 12:00:00".to_string(),
    };
    let mut buf = Vec::new();
    write_record_row(&mut buf, &record, 3).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "M1,4,-1.235,trad_test,2026-08-30 12:00:00\n"
    );
}
