//! Measurement records: sequence numbering, the append-only CSV log, and
//! per-record snapshot images.
//!
//! The ledger owns the record history used to derive the next sequence
//! number for a `(subject, category)` pair. The durable CSV is replayed at
//! startup so numbering survives process restarts. A commit is atomic from
//! the caller's perspective: either the CSV row and the snapshot PNG are
//! both stored, or the commit fails and is not counted toward future
//! sequence numbers.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::frame::Frame;

/// Column header written once when the log file is first created.
pub const CSV_HEADER: &str = "subject,sequence_number,length_in,category,timestamp";

/// One committed measurement. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub subject: String,
    /// Positive, unique within `(subject, category)`.
    pub sequence_number: u32,
    /// Physical length in inches; sign carries the gesture direction.
    pub length_in: f64,
    pub category: String,
    /// `YYYY-MM-DD HH:MM:SS`, local time.
    pub timestamp: String,
}

/// Errors surfaced by [`MeasurementLedger::commit`].
#[derive(Debug)]
pub enum LedgerError {
    /// Category is not in the configured closed set.
    UnknownCategory(String),
    /// Subject is empty or contains characters that would corrupt the CSV
    /// row or the snapshot path (`,`, `/`, `\`).
    InvalidSubject(String),
    /// Log append or snapshot write failed; the record was not counted.
    Persistence(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::UnknownCategory(c) => write!(f, "unknown category: {c}"),
            LedgerError::InvalidSubject(s) => write!(f, "invalid subject: {s:?}"),
            LedgerError::Persistence(e) => write!(f, "failed to persist measurement: {e}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Owns the record history, the CSV log, and the snapshot store.
pub struct MeasurementLedger {
    csv_path: PathBuf,
    snapshot_root: PathBuf,
    categories: Vec<String>,
    length_decimals: usize,
    records: Vec<MeasurementRecord>,
}

impl MeasurementLedger {
    /// Open the ledger, replaying any existing CSV log so that sequence
    /// numbering continues where a previous run left off. A missing log
    /// file is an empty history; malformed rows are skipped.
    pub fn open<P: Into<PathBuf>>(
        csv_path: P,
        snapshot_root: P,
        categories: Vec<String>,
        length_decimals: usize,
    ) -> std::io::Result<Self> {
        let csv_path = csv_path.into();
        let records = match std::fs::read_to_string(&csv_path) {
            Ok(txt) => parse_log(&txt),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            csv_path,
            snapshot_root: snapshot_root.into(),
            categories,
            length_decimals,
            records,
        })
    }

    /// A ledger with an empty history, for callers that must keep running
    /// when the durable log cannot be read back.
    pub fn empty<P: Into<PathBuf>>(
        csv_path: P,
        snapshot_root: P,
        categories: Vec<String>,
        length_decimals: usize,
    ) -> Self {
        Self {
            csv_path: csv_path.into(),
            snapshot_root: snapshot_root.into(),
            categories,
            length_decimals,
            records: Vec::new(),
        }
    }

    /// Next sequence number for `(subject, category)`: the count of existing
    /// records matching both keys exactly (case-sensitive), plus one.
    pub fn next_sequence_number(&self, subject: &str, category: &str) -> u32 {
        self.records
            .iter()
            .filter(|r| r.subject == subject && r.category == category)
            .count() as u32
            + 1
    }

    /// All records known to this ledger (replayed + committed this run).
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Path a committed snapshot is stored at for the given record keys.
    pub fn snapshot_path(&self, subject: &str, category: &str, sequence_number: u32) -> PathBuf {
        self.snapshot_root
            .join(subject)
            .join(category)
            .join(format!("{sequence_number}.png"))
    }

    /// Commit a measurement: assign the sequence number, append the CSV row
    /// and store the held frame as the snapshot image.
    ///
    /// The snapshot is written before the CSV row and removed again
    /// (best-effort) if the row append fails, so a half-committed
    /// measurement never influences future numbering.
    pub fn commit(
        &mut self,
        subject: &str,
        category: &str,
        length_in: f64,
        frame: &Frame,
    ) -> Result<MeasurementRecord, LedgerError> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(LedgerError::UnknownCategory(category.to_string()));
        }
        if subject.is_empty() || subject.contains([',', '/', '\\']) {
            return Err(LedgerError::InvalidSubject(subject.to_string()));
        }

        let record = MeasurementRecord {
            subject: subject.to_string(),
            sequence_number: self.next_sequence_number(subject, category),
            length_in,
            category: category.to_string(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let snapshot = self.snapshot_path(subject, category, record.sequence_number);
        if let Some(dir) = snapshot.parent() {
            std::fs::create_dir_all(dir).map_err(|e| LedgerError::Persistence(e.to_string()))?;
        }
        frame
            .to_rgba_image()
            .save(&snapshot)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;

        if let Err(e) = self.append_row(&record) {
            // Roll back the snapshot so the store stays consistent with the log.
            let _ = std::fs::remove_file(&snapshot);
            return Err(LedgerError::Persistence(e.to_string()));
        }

        self.records.push(record.clone());
        Ok(record)
    }

    fn append_row(&self, record: &MeasurementRecord) -> std::io::Result<()> {
        if let Some(dir) = self.csv_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let write_header = !self.csv_path.exists();
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;
        if write_header {
            writeln!(f, "{CSV_HEADER}")?;
        }
        write_record_row(&mut f, record, self.length_decimals)?;
        f.flush()
    }
}

impl fmt::Debug for MeasurementLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementLedger")
            .field("csv_path", &self.csv_path)
            .field("snapshot_root", &self.snapshot_root)
            .field("records", &self.records.len())
            .finish()
    }
}

/// Write one CSV row for `record` with the length formatted to
/// `length_decimals` places.
pub fn write_record_row<W: Write>(
    w: &mut W,
    record: &MeasurementRecord,
    length_decimals: usize,
) -> std::io::Result<()> {
    writeln!(
        w,
        "{},{},{:.prec$},{},{}",
        record.subject,
        record.sequence_number,
        record.length_in,
        record.category,
        record.timestamp,
        prec = length_decimals
    )
}

/// Parse a previously written log. Malformed rows are skipped; fields never
/// contain commas because [`MeasurementLedger::commit`] rejects them.
fn parse_log(txt: &str) -> Vec<MeasurementRecord> {
    let mut records = Vec::new();
    for line in txt.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            continue;
        }
        let (Ok(sequence_number), Ok(length_in)) =
            (fields[1].parse::<u32>(), fields[2].parse::<f64>())
        else {
            continue;
        };
        records.push(MeasurementRecord {
            subject: fields[0].to_string(),
            sequence_number,
            length_in,
            category: fields[3].to_string(),
            timestamp: fields[4].to_string(),
        });
    }
    records
}

/// The four category labels of the reference deployment. Used as the
/// default closed set when the configuration does not override it.
pub fn default_categories() -> Vec<String> {
    ["inkframe_cal", "inkframe_test", "trad_cal", "trad_test"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
