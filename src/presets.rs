// Saved command presets: a flat JSON array of {name, command} records.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const PRESETS_FILE_NAME: &str = "presets.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub command: String,
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Failed to access presets file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse presets file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads the preset list. A missing file is an empty list, not an error.
pub fn load_presets(path: &Path) -> Result<Vec<Preset>, PresetError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_presets(path: &Path, presets: &[Preset]) -> Result<(), PresetError> {
    let payload = serde_json::to_string_pretty(presets)?;
    fs::write(path, payload)?;
    Ok(())
}
