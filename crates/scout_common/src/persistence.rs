//! Persistence sink - one timestamped JSON text file per completed session

use crate::error::IntakeError;
use crate::record::CandidateRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores a finished record and returns an identifier to show the candidate
pub trait CandidateStore: Send + Sync {
    fn save(&self, record: &CandidateRecord) -> Result<String, IntakeError>;
}

/// Writes `candidate_<YYYYMMDD_HHMMSS>.txt` into a directory.
///
/// Seconds granularity; a second save in the same second overwrites the first.
#[derive(Debug, Clone)]
pub struct FileCandidateStore {
    dir: PathBuf,
}

impl FileCandidateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the current working directory
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(at: DateTime<Local>) -> String {
        format!("candidate_{}.txt", at.format("%Y%m%d_%H%M%S"))
    }

    /// Read a persisted record back
    pub fn load(path: &Path) -> Result<CandidateRecord, IntakeError> {
        let text = fs::read_to_string(path).map_err(|source| IntakeError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Pretty JSON with four-space indentation
fn to_json(record: &CandidateRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    record.serialize(&mut ser)?;
    Ok(out)
}

impl CandidateStore for FileCandidateStore {
    fn save(&self, record: &CandidateRecord) -> Result<String, IntakeError> {
        let file_name = Self::file_name_for(Local::now());
        let path = self.dir.join(&file_name);

        let body = to_json(record)?;
        fs::write(&path, body).map_err(|source| IntakeError::Persist {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "candidate record saved");
        Ok(file_name)
    }
}
