use crate::identity::Identity;
use crate::log::CompletionLog;
use crate::models::{Task, TrackerData};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EXPORT_VERSION: u32 = 1;

/// Portable snapshot of one identity's tasks and completion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportBundle {
    pub version: u32,
    pub device_id: String,
    /// Unix epoch milliseconds at export time.
    pub timestamp: i64,
    pub tasks: Vec<Task>,
    pub logs: CompletionLog,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import payload is not a valid export: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported export version {0}, expected {}", EXPORT_VERSION)]
    UnsupportedVersion(u32),
}

pub fn export(identity: &Identity, data: &TrackerData, timestamp: i64) -> ExportBundle {
    ExportBundle {
        version: EXPORT_VERSION,
        device_id: identity.to_string(),
        timestamp,
        tasks: data.tasks.clone(),
        logs: data.log.clone(),
    }
}

/// Parses and validates a bundle; nothing is returned unless the whole
/// payload is usable.
pub fn parse_import(payload: &[u8]) -> Result<TrackerData, ImportError> {
    let bundle: ExportBundle = serde_json::from_slice(payload)?;
    if bundle.version != EXPORT_VERSION {
        return Err(ImportError::UnsupportedVersion(bundle.version));
    }
    Ok(TrackerData {
        tasks: bundle.tasks,
        log: bundle.logs,
    })
}
