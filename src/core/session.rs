//! Host-supplied distance session: walk state plus history
//!
//! Lets a host that runs one process per frame thread state between
//! invocations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::history::DistanceHistory;
use crate::types::{DistanceState, Result};

/// Everything the distance path needs to continue where it left off
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceSession {
    pub state: DistanceState,
    pub history: DistanceHistory,
}

/// Write session as pretty JSON, creating parent directories
pub fn save_session(session: &DistanceSession, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a session; `Ok(None)` if the file does not exist yet
pub fn load_session(path: &Path) -> Result<Option<DistanceSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}
