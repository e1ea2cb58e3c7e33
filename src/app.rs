// src/app.rs

use crate::classify::ClassifyStore;
use crate::database::{DataPaths, RecordStore};
use crate::error::{Result, TrackerError};
use crate::models::{NewProblem, ProblemEdit, ProblemRecord};
use crate::pedagogy::{self, CategoryScore, Membership, Recommendation, Scored};
use crate::repository::WorkingSet;
use chrono::NaiveDate;
use log::info;
use rand::Rng;

// --- App State ---

/// One session: the working set, its backing file, and the classification index.
/// Record edits rewrite the whole records file; the index persists itself.
/// The records file is rewritten even when the index write fails, so it always
/// matches the working set.
pub struct Tracker {
    records: WorkingSet,
    store: RecordStore,
    index: ClassifyStore,
}

impl Tracker {
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let store = RecordStore::new(&paths.records);
        let records = WorkingSet::from_records(store.load()?);
        let index = ClassifyStore::open(&paths.index)?;
        info!(
            "Opened tracker with {} records from {:?}",
            records.len(),
            store.path()
        );
        Ok(Tracker { records, store, index })
    }

    pub fn records(&self) -> &WorkingSet {
        &self.records
    }

    pub fn index(&self) -> &ClassifyStore {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut ClassifyStore {
        &mut self.index
    }

    pub fn add(&mut self, problem: NewProblem, today: NaiveDate) -> Result<ProblemRecord> {
        let outcome = self.records.add_new(problem, &mut self.index, today).cloned();
        self.save()?;
        outcome
    }

    pub fn update(&mut self, problem_id: i64, edit: ProblemEdit, today: NaiveDate) -> Result<ProblemRecord> {
        let outcome = self
            .records
            .update(problem_id, edit, &mut self.index, today)
            .cloned();
        // an unknown id leaves the working set untouched
        if !matches!(outcome, Err(TrackerError::NotFound(_))) {
            self.save()?;
        }
        outcome
    }

    pub fn today(&self, today: NaiveDate) -> Vec<&ProblemRecord> {
        self.records.records_on(today)
    }

    pub fn recommend<R: Rng + ?Sized>(&self, today: NaiveDate, rng: &mut R) -> Recommendation<'_> {
        pedagogy::select_recommended(self.records.records(), self.index.index(), today, rng)
    }

    pub fn category_scores(&self, today: NaiveDate) -> Vec<CategoryScore> {
        pedagogy::category_score_table(
            self.records.records(),
            Membership::Index(self.index.index()),
            today,
        )
    }

    pub fn review_queue(&self, today: NaiveDate) -> Vec<Scored<'_>> {
        pedagogy::rank_by_review(self.records.records(), today)
    }

    fn save(&self) -> Result<()> {
        self.store.save(self.records.records())
    }
}
