//! UI state persistence: save and load operator-facing state to/from JSON.
//!
//! Only convenience state lives here (the last subject and category).
//! Calibration has its own plain-text file and measurements
//! their CSV log; see [`calibration`](crate::calibration) and
//! [`ledger`](crate::ledger).

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Serializable operator-facing UI state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiStateSerde {
    pub subject: String,
    pub category: String,
}

impl Default for UiStateSerde {
    fn default() -> Self {
        Self {
            subject: String::new(),
            category: String::new(),
        }
    }
}

/// Serialize the UI state as pretty JSON.
pub fn state_to_json(state: &UiStateSerde) -> Result<String, String> {
    serde_json::to_string_pretty(state).map_err(|e| e.to_string())
}

/// Deserialize UI state from JSON.
pub fn state_from_json(json: &str) -> Result<UiStateSerde, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Save the UI state to a JSON file at the given path.
pub fn save_state_to_path(state: &UiStateSerde, path: &Path) -> Result<(), String> {
    let txt = state_to_json(state)?;
    std::fs::write(path, txt).map_err(|e| e.to_string())
}

/// Load the UI state from a JSON file at the given path.
pub fn load_state_from_path(path: &Path) -> Result<UiStateSerde, String> {
    let txt = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    state_from_json(&txt)
}
