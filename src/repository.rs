// src/repository.rs

use crate::classify::TagSync;
use crate::error::{Result, TrackerError};
use crate::models::{NewProblem, ProblemEdit, ProblemRecord};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// The in-memory record batch for one session. Holds at most one record per
/// problem id; the batch is persisted as a whole by `RecordStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    records: Vec<ProblemRecord>,
}

impl WorkingSet {
    /// Builds a working set, keeping the last record seen for a repeated id.
    pub fn from_records(records: Vec<ProblemRecord>) -> Self {
        let mut set = WorkingSet::default();
        for record in records {
            if let Some(slot) = set.position(record.id) {
                warn!("Duplicate record for problem {}, keeping the later one", record.id);
                set.records[slot] = record;
            } else {
                set.records.push(record);
            }
        }
        set
    }

    pub fn records(&self) -> &[ProblemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, problem_id: i64) -> Option<&ProblemRecord> {
        self.records.iter().find(|r| r.id == problem_id)
    }

    /// Records last practiced on `date`.
    pub fn records_on(&self, date: NaiveDate) -> Vec<&ProblemRecord> {
        self.records.iter().filter(|r| r.date == date).collect()
    }

    /// Logs a first solve (`times = 1`) and files it under its tag. An existing
    /// record with the same id is overwritten. A blank tag is not filed.
    pub fn add_new(
        &mut self,
        problem: NewProblem,
        index: &mut impl TagSync,
        today: NaiveDate,
    ) -> Result<&ProblemRecord> {
        let record = ProblemRecord {
            id: problem.id,
            date: problem.date.unwrap_or(today),
            difficulty: problem.difficulty,
            time_cost: problem.time_cost,
            times: 1,
            tag: problem.tag,
            reference_url: problem.reference_url,
        };

        let slot = match self.position(record.id) {
            Some(slot) => {
                warn!("Problem {} already tracked, overwriting its record", record.id);
                self.records[slot] = record;
                slot
            }
            None => {
                self.records.push(record);
                self.records.len() - 1
            }
        };

        let added = &self.records[slot];
        info!("Added problem {} ({:?})", added.id, added.tag);
        if !added.tag.trim().is_empty() {
            index.tag_added(added.id, &added.tag)?;
        }
        Ok(added)
    }

    /// Logs another practice of `problem_id`. Blank edit fields keep the old
    /// values; a new tag replaces every index membership of the problem.
    pub fn update(
        &mut self,
        problem_id: i64,
        edit: ProblemEdit,
        index: &mut impl TagSync,
        today: NaiveDate,
    ) -> Result<&ProblemRecord> {
        let slot = self
            .position(problem_id)
            .ok_or(TrackerError::NotFound(problem_id))?;
        let record = &mut self.records[slot];

        record.date = edit.date.unwrap_or(today);
        if let Some(difficulty) = ProblemEdit::non_blank(&edit.difficulty) {
            record.difficulty = difficulty.to_string();
        }
        if let Some(time_cost) = ProblemEdit::non_blank(&edit.time_cost) {
            record.time_cost = time_cost.to_string();
        }
        record.times += 1;

        let new_tag = ProblemEdit::non_blank(&edit.tag).map(str::to_string);
        if let Some(tag) = &new_tag {
            record.tag = tag.clone();
        }
        debug!("Updated problem {}: times {}", record.id, record.times);

        if let Some(tag) = new_tag {
            index.tag_replaced(problem_id, &tag)?;
        }
        info!("Updated problem {}", problem_id);
        Ok(&self.records[slot])
    }

    fn position(&self, problem_id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == problem_id)
    }
}
