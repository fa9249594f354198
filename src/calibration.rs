//! Calibration factor ownership and persistence.
//!
//! The calibration factor is a single positive scalar (inches per native
//! pixel). It is persisted as one decimal number in a plain text file so
//! that a calibration survives process restarts. Absent or unparseable
//! content degrades to "unset" and is never an error for the caller.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised when applying a new calibration.
#[derive(Debug)]
pub enum CalibrationError {
    /// The reference gesture had zero pixel length, or the entered known
    /// length was not a positive finite number.
    Invalid { known_length: f64, pixel_distance: f64 },
    /// Persisting the factor failed; any previously stored value is intact.
    Io(std::io::Error),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::Invalid {
                known_length,
                pixel_distance,
            } => write!(
                f,
                "invalid calibration: known length {known_length}, pixel distance {pixel_distance}"
            ),
            CalibrationError::Io(e) => write!(f, "failed to persist calibration: {e}"),
        }
    }
}

impl std::error::Error for CalibrationError {}

impl From<std::io::Error> for CalibrationError {
    fn from(e: std::io::Error) -> Self {
        CalibrationError::Io(e)
    }
}

/// Owns the calibration factor and its on-disk representation.
pub struct CalibrationStore {
    path: PathBuf,
    factor: Option<f64>,
}

impl CalibrationStore {
    /// Open the store backed by `path`, loading any previously persisted
    /// factor. A missing file or garbage content simply means "unset".
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let factor = load_factor(&path);
        Self { path, factor }
    }

    /// The currently applied factor (inches per pixel), if calibrated.
    pub fn get(&self) -> Option<f64> {
        self.factor
    }

    pub fn is_set(&self) -> bool {
        self.factor.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compute and persist a new factor from a reference gesture.
    ///
    /// The operator-entered known length is always positive, so the factor
    /// is derived from the *magnitude* of the gesture: the stored value is
    /// positive regardless of drag direction. The file is replaced with
    /// write-to-temp-then-rename semantics; a crash mid-write cannot
    /// corrupt a previously valid value, and on failure the in-memory
    /// factor is left unchanged.
    pub fn set(&mut self, known_length: f64, pixel_distance: f64) -> Result<f64, CalibrationError> {
        let pixels = pixel_distance.abs();
        if !(known_length.is_finite() && known_length > 0.0) || !(pixels.is_finite() && pixels > 0.0)
        {
            return Err(CalibrationError::Invalid {
                known_length,
                pixel_distance,
            });
        }
        let factor = known_length / pixels;
        persist_factor(&self.path, factor)?;
        self.factor = Some(factor);
        Ok(factor)
    }

    /// Forget the calibration and remove the persisted file.
    pub fn clear(&mut self) -> std::io::Result<()> {
        self.factor = None;
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for CalibrationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalibrationStore")
            .field("path", &self.path)
            .field("factor", &self.factor)
            .finish()
    }
}

/// Read a persisted factor from `path`. Returns `None` for a missing file,
/// unparseable content, or a non-positive / non-finite value.
pub fn load_factor(path: &Path) -> Option<f64> {
    let txt = std::fs::read_to_string(path).ok()?;
    let value: f64 = txt.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn persist_factor(path: &Path, factor: f64) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, format!("{factor}"))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
