// src/models.rs

use crate::constants::*;
use crate::error::{Result, TrackerError};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// --- Data Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Unknown = 4,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unknown => "unknown",
        }
    }

    /// Multiplier applied to the forget factor of the review score.
    pub fn weight(&self) -> f64 {
        match self {
            Difficulty::Easy => DIFFICULTY_WEIGHT_EASY,
            Difficulty::Medium => DIFFICULTY_WEIGHT_MEDIUM,
            Difficulty::Hard => DIFFICULTY_WEIGHT_HARD,
            Difficulty::Unknown => DIFFICULTY_WEIGHT_UNKNOWN,
        }
    }
}

impl FromStr for Difficulty {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parsed = match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Unknown, // Default fallback
        };
        Ok(parsed)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the menu shorthand (`1`, `2`, `3`) onto difficulty names.
/// Anything else is kept verbatim so the record shows what was typed.
pub fn normalize_difficulty_input(raw: &str) -> String {
    match raw.trim() {
        "1" => Difficulty::Easy.as_str().to_string(),
        "2" => Difficulty::Medium.as_str().to_string(),
        "3" => Difficulty::Hard.as_str().to_string(),
        other => other.to_string(),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(raw.to_string()))
}

/// Converts a `minutes:seconds` or bare `minutes` string into seconds.
/// Anything else, including overflow, counts as zero.
pub fn duration_in_seconds(raw: &str) -> i64 {
    let parts: Vec<&str> = raw.split(':').collect();
    let parsed = match parts.as_slice() {
        [minutes] => parse_part(minutes).and_then(|m| m.checked_mul(60)),
        [minutes, seconds] => parse_part(minutes)
            .zip(parse_part(seconds))
            .and_then(|(m, s)| m.checked_mul(60)?.checked_add(s)),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        debug!("Unparseable time cost {:?}, counting as 0s", raw);
        0
    })
}

fn parse_part(part: &str) -> Option<i64> {
    part.trim().parse().ok()
}

/// One practiced problem in the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordFile", into = "RecordFile")]
pub struct ProblemRecord {
    pub id: i64,
    /// Last practice date
    pub date: NaiveDate,
    /// Free-form, matched case-insensitively when scoring
    pub difficulty: String,
    /// `minutes:seconds` or bare minutes
    pub time_cost: String,
    pub times: i64,
    /// Current category. The classification index keeps the multi-category view.
    pub tag: String,
    pub reference_url: String,
}

impl ProblemRecord {
    pub fn new(id: i64, date: NaiveDate) -> Self {
        ProblemRecord {
            id,
            date,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            time_cost: DEFAULT_TIME_COST.to_string(),
            times: 0,
            tag: String::new(),
            reference_url: String::new(),
        }
    }

    pub fn difficulty_level(&self) -> Difficulty {
        // Infallible
        self.difficulty.parse().unwrap_or(Difficulty::Unknown)
    }

    pub fn time_cost_in_seconds(&self) -> i64 {
        duration_in_seconds(&self.time_cost)
    }

    /// Whole days from the last practice to `today`; negative for future dates.
    pub fn days_since(&self, today: NaiveDate) -> i64 {
        (today - self.date).num_days()
    }
}

impl fmt::Display for ProblemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem:")?;
        writeln!(f, "  leetcode_id={}", self.id)?;
        writeln!(f, "  leetcode_url={}", self.reference_url)?;
        writeln!(f, "  date={}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "  difficulty={}", self.difficulty)?;
        writeln!(f, "  time_cost={}", self.time_cost)?;
        writeln!(f, "  times={}", self.times)?;
        write!(f, "  tag={}", self.tag)
    }
}

// --- On-disk Shape ---

#[derive(Serialize, Deserialize)]
struct RecordFile {
    leetcode_id: i64,
    #[serde(default)]
    leetcode_url: String,
    meta: RecordMeta,
}

#[derive(Serialize, Deserialize)]
struct RecordMeta {
    date: NaiveDate,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_time_cost")]
    time_cost: String,
    #[serde(default)]
    times: i64,
    #[serde(default)]
    tag: String,
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

fn default_time_cost() -> String {
    DEFAULT_TIME_COST.to_string()
}

impl From<RecordFile> for ProblemRecord {
    fn from(file: RecordFile) -> Self {
        ProblemRecord {
            id: file.leetcode_id,
            date: file.meta.date,
            difficulty: file.meta.difficulty,
            time_cost: file.meta.time_cost,
            times: file.meta.times,
            tag: file.meta.tag,
            reference_url: file.leetcode_url,
        }
    }
}

impl From<ProblemRecord> for RecordFile {
    fn from(record: ProblemRecord) -> Self {
        RecordFile {
            leetcode_id: record.id,
            leetcode_url: record.reference_url,
            meta: RecordMeta {
                date: record.date,
                difficulty: record.difficulty,
                time_cost: record.time_cost,
                times: record.times,
                tag: record.tag,
            },
        }
    }
}

// --- Editing Inputs ---

/// Fields collected when logging a problem for the first time.
#[derive(Debug, Clone, Default)]
pub struct NewProblem {
    pub id: i64,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub difficulty: String,
    pub time_cost: String,
    pub tag: String,
    pub reference_url: String,
}

/// Fields supplied when re-practicing a problem. `None` or blank keeps the old value,
/// except `date`, which falls back to today.
#[derive(Debug, Clone, Default)]
pub struct ProblemEdit {
    pub date: Option<NaiveDate>,
    pub difficulty: Option<String>,
    pub time_cost: Option<String>,
    pub tag: Option<String>,
}

impl ProblemEdit {
    pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}
