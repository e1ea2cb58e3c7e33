// src/classify.rs

use crate::database::{read_json, write_json};
use crate::error::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Bidirectional category <-> problem mapping.
///
/// Both maps are exact inverses and never hold empty sets. Problem ids are
/// written as string keys in `problem_to_categories`, which is what serde_json
/// does for integer map keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationIndex {
    #[serde(default)]
    category_to_problems: BTreeMap<String, BTreeSet<i64>>,
    #[serde(default)]
    problem_to_categories: BTreeMap<i64, BTreeSet<String>>,
}

impl ClassificationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `problem_id` and `category`. Adding an existing pair changes nothing.
    pub fn add(&mut self, problem_id: i64, category: &str) {
        self.category_to_problems
            .entry(category.to_string())
            .or_default()
            .insert(problem_id);
        self.problem_to_categories
            .entry(problem_id)
            .or_default()
            .insert(category.to_string());
    }

    /// Unlinks the pair, dropping whichever side becomes empty.
    pub fn remove(&mut self, problem_id: i64, category: &str) {
        if let Some(problems) = self.category_to_problems.get_mut(category) {
            problems.remove(&problem_id);
            if problems.is_empty() {
                self.category_to_problems.remove(category);
            }
        }

        if let Some(categories) = self.problem_to_categories.get_mut(&problem_id) {
            categories.remove(category);
            if categories.is_empty() {
                self.problem_to_categories.remove(&problem_id);
            }
        }
    }

    /// Overwrites every membership of `problem_id` with `categories` (deduplicated).
    /// An empty list detaches the problem entirely.
    pub fn replace_categories<I, S>(&mut self, problem_id: i64, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new_categories: BTreeSet<String> = categories.into_iter().map(Into::into).collect();

        let current = self.problem_to_categories.remove(&problem_id).unwrap_or_default();
        for category in &current {
            if let Some(problems) = self.category_to_problems.get_mut(category) {
                problems.remove(&problem_id);
                if problems.is_empty() {
                    self.category_to_problems.remove(category);
                }
            }
        }

        if new_categories.is_empty() {
            return;
        }

        for category in &new_categories {
            self.category_to_problems
                .entry(category.clone())
                .or_default()
                .insert(problem_id);
        }
        self.problem_to_categories.insert(problem_id, new_categories);
    }

    pub fn categories_of(&self, problem_id: i64) -> BTreeSet<String> {
        self.problem_to_categories
            .get(&problem_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Sorted, duplicate-free problem ids under `category`.
    pub fn problems_in(&self, category: &str) -> Vec<i64> {
        self.category_to_problems
            .get(category)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, problem_id: i64, category: &str) -> bool {
        self.category_to_problems
            .get(category)
            .is_some_and(|ids| ids.contains(&problem_id))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_to_problems.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.category_to_problems.is_empty()
    }

    /// Rebuilds both maps from the union of pairs found on either side.
    /// Returns true when the loaded data was not already consistent.
    fn reconcile(&mut self) -> bool {
        let mut pairs: BTreeSet<(i64, String)> = BTreeSet::new();
        for (category, ids) in &self.category_to_problems {
            pairs.extend(ids.iter().map(|id| (*id, category.clone())));
        }
        for (id, categories) in &self.problem_to_categories {
            pairs.extend(categories.iter().map(|c| (*id, c.clone())));
        }

        let mut rebuilt = ClassificationIndex::new();
        for (id, category) in &pairs {
            rebuilt.add(*id, category);
        }

        let changed = rebuilt != *self;
        *self = rebuilt;
        changed
    }
}

/// Keeps index memberships in step with record edits.
pub trait TagSync {
    /// A record was logged under `tag`.
    fn tag_added(&mut self, problem_id: i64, tag: &str) -> Result<()>;

    /// A record's current tag changed to `tag`, replacing all memberships.
    fn tag_replaced(&mut self, problem_id: i64, tag: &str) -> Result<()>;
}

impl TagSync for ClassificationIndex {
    fn tag_added(&mut self, problem_id: i64, tag: &str) -> Result<()> {
        self.add(problem_id, tag);
        Ok(())
    }

    fn tag_replaced(&mut self, problem_id: i64, tag: &str) -> Result<()> {
        self.replace_categories(problem_id, [tag]);
        Ok(())
    }
}

/// Classification index with write-through persistence: every mutation is
/// saved to disk before returning.
#[derive(Debug)]
pub struct ClassifyStore {
    index: ClassificationIndex,
    path: PathBuf,
}

impl ClassifyStore {
    /// Loads the index from `path`, creating an empty file if none exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let index = if path.exists() {
            let mut index: ClassificationIndex = read_json(&path)?;
            if index.reconcile() {
                warn!("Classification index at {:?} was inconsistent, repaired", path);
            }
            index
        } else {
            info!("No classification index at {:?}, creating an empty one", path);
            let index = ClassificationIndex::new();
            write_json(&path, &index)?;
            index
        };

        debug!(
            "Loaded classification index with {} categories",
            index.category_to_problems.len()
        );
        Ok(ClassifyStore { index, path })
    }

    pub fn index(&self) -> &ClassificationIndex {
        &self.index
    }

    pub fn add(&mut self, problem_id: i64, category: &str) -> Result<()> {
        info!("Index: add {} -> {:?}", problem_id, category);
        self.index.add(problem_id, category);
        self.persist()
    }

    pub fn remove(&mut self, problem_id: i64, category: &str) -> Result<()> {
        info!("Index: remove {} from {:?}", problem_id, category);
        self.index.remove(problem_id, category);
        self.persist()
    }

    pub fn replace_categories<I, S>(&mut self, problem_id: i64, categories: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.replace_categories(problem_id, categories);
        info!(
            "Index: {} now in {:?}",
            problem_id,
            self.index.categories_of(problem_id)
        );
        self.persist()
    }

    pub fn categories_of(&self, problem_id: i64) -> BTreeSet<String> {
        self.index.categories_of(problem_id)
    }

    pub fn problems_in(&self, category: &str) -> Vec<i64> {
        self.index.problems_in(category)
    }

    fn persist(&self) -> Result<()> {
        write_json(&self.path, &self.index)
    }
}

impl TagSync for ClassifyStore {
    fn tag_added(&mut self, problem_id: i64, tag: &str) -> Result<()> {
        self.add(problem_id, tag)
    }

    fn tag_replaced(&mut self, problem_id: i64, tag: &str) -> Result<()> {
        self.replace_categories(problem_id, [tag])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Both directions agree and no key maps to an empty set.
    fn assert_consistent(index: &ClassificationIndex) {
        for (category, ids) in &index.category_to_problems {
            assert!(!ids.is_empty(), "empty category {:?}", category);
            for id in ids {
                assert!(index.categories_of(*id).contains(category));
            }
        }
        for (id, categories) in &index.problem_to_categories {
            assert!(!categories.is_empty(), "empty problem {}", id);
            for category in categories {
                assert!(index.problems_in(category).contains(id));
            }
        }
    }

    #[test]
    fn add_links_both_directions() {
        let mut index = ClassificationIndex::new();
        index.add(1, "greedy");
        index.add(1, "greedy");
        index.add(2, "greedy");

        assert_eq!(index.problems_in("greedy"), vec![1, 2]);
        assert_eq!(index.categories_of(1), set(&["greedy"]));
        assert!(index.contains(2, "greedy"));
        assert_consistent(&index);
    }

    #[test]
    fn remove_prunes_empty_entries() {
        let mut index = ClassificationIndex::new();
        index.add(1, "dp");
        index.remove(1, "dp");

        assert!(index.is_empty());
        assert!(index.categories_of(1).is_empty());
        assert!(index.problems_in("dp").is_empty());
        assert_eq!(index, ClassificationIndex::new());
    }

    #[test]
    fn remove_missing_pair_is_noop() {
        let mut index = ClassificationIndex::new();
        index.add(1, "dp");
        index.remove(2, "dp");
        index.remove(1, "graph");

        assert_eq!(index.problems_in("dp"), vec![1]);
        assert_consistent(&index);
    }

    #[test]
    fn replace_with_empty_detaches_problem() {
        let mut index = ClassificationIndex::new();
        index.add(5, "stack");
        index.add(5, "queue");
        index.add(6, "stack");

        index.replace_categories(5, Vec::<String>::new());

        assert!(index.categories_of(5).is_empty());
        assert_eq!(index.problems_in("stack"), vec![6]);
        assert!(index.problems_in("queue").is_empty());
        assert_eq!(index.categories().collect::<Vec<_>>(), vec!["stack"]);
        assert_consistent(&index);
    }

    #[test]
    fn replace_collapses_duplicates_and_overwrites() {
        let mut index = ClassificationIndex::new();
        index.add(3, "old");

        index.replace_categories(3, ["a", "a", "b"]);

        assert_eq!(index.categories_of(3), set(&["a", "b"]));
        assert_eq!(index.problems_in("a"), vec![3]);
        assert_eq!(index.problems_in("b"), vec![3]);
        assert!(index.problems_in("old").is_empty());
        assert_consistent(&index);
    }

    #[test]
    fn problems_are_sorted_ascending() {
        let mut index = ClassificationIndex::new();
        for id in [42, 7, 19, 7] {
            index.add(id, "array");
        }
        assert_eq!(index.problems_in("array"), vec![7, 19, 42]);
    }

    #[test]
    fn serializes_with_string_problem_keys() {
        let mut index = ClassificationIndex::new();
        index.add(15, "two pointers");

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["category_to_problems"]["two pointers"][0], 15);
        assert_eq!(value["problem_to_categories"]["15"][0], "two pointers");

        let back: ClassificationIndex = serde_json::from_value(value).unwrap();
        assert_eq!(back, index);
    }

    #[test]
    fn reconcile_repairs_one_sided_entries() {
        let json = r#"{
            "category_to_problems": {"dp": [1, 2], "empty": []},
            "problem_to_categories": {"1": ["dp"], "3": ["graph"]}
        }"#;
        let mut index: ClassificationIndex = serde_json::from_str(json).unwrap();
        assert!(index.reconcile());

        assert_eq!(index.problems_in("dp"), vec![1, 2]);
        assert_eq!(index.problems_in("graph"), vec![3]);
        assert!(index.problems_in("empty").is_empty());
        assert_consistent(&index);
        assert!(!index.reconcile());
    }

    #[test]
    fn tag_sync_replaces_membership() {
        let mut index = ClassificationIndex::new();
        index.tag_added(9, "heap").unwrap();
        index.tag_added(9, "sort").unwrap();
        index.tag_replaced(9, "greedy").unwrap();

        assert_eq!(index.categories_of(9), set(&["greedy"]));
        assert!(index.problems_in("heap").is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64, String),
        Remove(i64, String),
        Replace(i64, Vec<String>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let id = 0i64..6;
        let category = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
        prop_oneof![
            (id.clone(), category.clone()).prop_map(|(i, c)| Op::Add(i, c)),
            (id.clone(), category.clone()).prop_map(|(i, c)| Op::Remove(i, c)),
            (id, prop::collection::vec(category, 0..4)).prop_map(|(i, cs)| Op::Replace(i, cs)),
        ]
    }

    proptest! {
        #[test]
        fn stays_consistent_under_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut index = ClassificationIndex::new();
            for op in ops {
                match op {
                    Op::Add(id, c) => index.add(id, &c),
                    Op::Remove(id, c) => index.remove(id, &c),
                    Op::Replace(id, cs) => {
                        let expected: BTreeSet<String> = cs.iter().cloned().collect();
                        index.replace_categories(id, cs);
                        prop_assert_eq!(index.categories_of(id), expected);
                    }
                }
                assert_consistent(&index);
            }
        }
    }
}
