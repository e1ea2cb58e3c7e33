// src/database.rs

use crate::constants::*;
use crate::error::{Result, TrackerError};
use crate::models::ProblemRecord;
use chrono::NaiveDate;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// --- JSON File Helpers ---

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| TrackerError::json(path, e))
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TrackerError::io(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(value).map_err(|e| TrackerError::json(path, e))?;
    fs::write(path, contents).map_err(|e| TrackerError::io(path, e))
}

// --- Data Directory ---

/// Locations of the two data files inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub records: PathBuf,
    pub index: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        DataPaths {
            records: dir.join(RECORDS_FILE_NAME),
            index: dir.join(INDEX_FILE_NAME),
        }
    }
}

pub fn init_data_dir(dir: &Path) -> Result<DataPaths> {
    debug!("init_data_dir: ensuring {:?} exists", dir);
    fs::create_dir_all(dir).map_err(|e| TrackerError::io(dir, e))?;
    Ok(DataPaths::in_dir(dir))
}

// --- Record Batch Storage ---

/// Flat-file store for the whole record batch. Saves always rewrite the file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record. A missing file is an empty batch.
    pub fn load(&self) -> Result<Vec<ProblemRecord>> {
        if !self.path.exists() {
            info!("No records file at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let records: Vec<ProblemRecord> = read_json(&self.path)?;
        debug!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    pub fn save(&self, records: &[ProblemRecord]) -> Result<()> {
        write_json(&self.path, records)?;
        debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

// --- Legacy Format ---

/// Record shape written before metadata was nested under `meta`.
#[derive(Debug, Deserialize)]
pub struct LegacyRecord {
    pub leetcode_id: i64,
    pub date: NaiveDate,
    pub difficulty: String,
    pub time_cost: String,
    pub times: i64,
}

impl From<LegacyRecord> for ProblemRecord {
    fn from(legacy: LegacyRecord) -> Self {
        ProblemRecord {
            difficulty: legacy.difficulty,
            time_cost: legacy.time_cost,
            times: legacy.times,
            ..ProblemRecord::new(legacy.leetcode_id, legacy.date)
        }
    }
}

/// Converts a legacy records file into the current format at `output`.
/// Returns the number of records written. `output` may be `input` itself. An
/// output already holding current-format records is only replaced with `force`.
pub fn migrate_legacy_file(input: &Path, output: &Path, force: bool) -> Result<usize> {
    if !force && holds_current_records(output) {
        return Err(TrackerError::WouldOverwrite(output.to_path_buf()));
    }

    let legacy: Vec<LegacyRecord> = read_json(input)?;
    let records: Vec<ProblemRecord> = legacy.into_iter().map(ProblemRecord::from).collect();
    write_json(output, &records)?;
    info!(
        "Migrated {} legacy records from {:?} to {:?}",
        records.len(),
        input,
        output
    );
    Ok(records.len())
}

fn holds_current_records(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match read_json::<Vec<ProblemRecord>>(path) {
        Ok(records) => !records.is_empty(),
        Err(e) => {
            debug!("{:?} is not a current-format batch: {}", path, e);
            false
        }
    }
}
