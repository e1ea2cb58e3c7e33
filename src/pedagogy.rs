// src/pedagogy.rs

use crate::classify::ClassificationIndex;
use crate::constants::*;
use crate::models::ProblemRecord;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;

// --- Public Interface ---

/// A record paired with the score it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a> {
    pub record: &'a ProblemRecord,
    pub score: f64,
}

/// What to practice today.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation<'a> {
    /// Best problems from the stalest category, highest score first.
    Category {
        name: String,
        staleness: f64,
        picks: Vec<Scored<'a>>,
    },
    /// No category had scorable members; a random sample of the working set.
    Random { picks: Vec<&'a ProblemRecord> },
}

impl<'a> Recommendation<'a> {
    pub fn category(&self) -> Option<&str> {
        match self {
            Recommendation::Category { name, .. } => Some(name.as_str()),
            Recommendation::Random { .. } => None,
        }
    }

    pub fn records(&self) -> Vec<&'a ProblemRecord> {
        match self {
            Recommendation::Category { picks, .. } => picks.iter().map(|s| s.record).collect(),
            Recommendation::Random { picks } => picks.clone(),
        }
    }
}

/// Which classification view decides a record's categories.
#[derive(Debug, Clone, Copy)]
pub enum Membership<'i> {
    /// The record's single current `tag`. Blank tags belong nowhere.
    CurrentTag,
    /// Every index category listing the record's id.
    Index(&'i ClassificationIndex),
}

impl Membership<'_> {
    /// Groups `records` by category. Categories without records are absent.
    pub fn group<'r>(&self, records: &'r [ProblemRecord]) -> BTreeMap<String, Vec<&'r ProblemRecord>> {
        let mut groups: BTreeMap<String, Vec<&'r ProblemRecord>> = BTreeMap::new();
        match self {
            Membership::CurrentTag => {
                for record in records.iter().filter(|r| !r.tag.trim().is_empty()) {
                    groups.entry(record.tag.clone()).or_default().push(record);
                }
            }
            Membership::Index(index) => {
                for category in index.categories() {
                    let ids = index.problems_in(category);
                    let members: Vec<&ProblemRecord> =
                        records.iter().filter(|r| ids.binary_search(&r.id).is_ok()).collect();
                    if !members.is_empty() {
                        groups.insert(category.to_string(), members);
                    }
                }
            }
        }
        groups
    }
}

/// Urgency of reviewing one problem: overdue-ness against the review ladder,
/// weighted by difficulty, plus up to 5 points for solve time.
pub fn item_review_score(record: &ProblemRecord, today: NaiveDate) -> f64 {
    let ideal = ideal_interval(record.times);
    let days_since_last = record.days_since(today);
    let forget = forget_factor(days_since_last, ideal);
    let weight = record.difficulty_level().weight();
    let time_factor =
        (record.time_cost_in_seconds() as f64 / TIME_FACTOR_SECONDS_PER_POINT).min(TIME_FACTOR_CAP);

    let score = round2(forget * weight + time_factor);
    debug!(
        "[Review] Problem {}: days {}, ideal {}, forget {:.3}, weight {}, time {:.2} => {}",
        record.id, days_since_last, ideal, forget, weight, time_factor, score
    );
    score
}

/// Ranking score within a recommended category: solve time and age, 5 points each.
pub fn item_recommendation_score(record: &ProblemRecord, today: NaiveDate) -> f64 {
    let time_score = (record.time_cost_in_seconds() as f64 / RECOMMEND_TIME_CEILING_SECONDS
        * RECOMMEND_PART_MAX)
        .min(RECOMMEND_PART_MAX);
    let date_score = (record.days_since(today) as f64 / RECOMMEND_DATE_CEILING_DAYS
        * RECOMMEND_PART_MAX)
        .min(RECOMMEND_PART_MAX);
    round2(time_score + date_score)
}

/// Per-category staleness (0-10): average solve time against 30 minutes and
/// age of the oldest record against 30 days, weighted equally. Unrounded, so
/// category selection compares exact values.
pub fn category_staleness_scores(
    records: &[ProblemRecord],
    membership: Membership<'_>,
    today: NaiveDate,
) -> BTreeMap<String, f64> {
    membership
        .group(records)
        .into_iter()
        .filter_map(|(name, members)| staleness(&members, today).map(|s| (name, s)))
        .collect()
}

/// Per-category mean of `item_review_score`.
pub fn category_review_scores(
    records: &[ProblemRecord],
    membership: Membership<'_>,
    today: NaiveDate,
) -> BTreeMap<String, f64> {
    membership
        .group(records)
        .into_iter()
        .filter_map(|(name, members)| mean_review(&members, today).map(|s| (name, s)))
        .collect()
}

/// One row of the category score table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub name: String,
    pub problems: usize,
    pub staleness: f64,
    pub review: f64,
}

/// Staleness and review score for every non-empty category, stalest first.
pub fn category_score_table(
    records: &[ProblemRecord],
    membership: Membership<'_>,
    today: NaiveDate,
) -> Vec<CategoryScore> {
    let mut rows: Vec<CategoryScore> = membership
        .group(records)
        .into_iter()
        .filter_map(|(name, members)| {
            Some(CategoryScore {
                problems: members.len(),
                staleness: staleness(&members, today)?,
                review: mean_review(&members, today)?,
                name,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.staleness.total_cmp(&a.staleness).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Every record ranked by review score, most urgent first.
pub fn rank_by_review(records: &[ProblemRecord], today: NaiveDate) -> Vec<Scored<'_>> {
    let mut ranked: Vec<Scored> = records
        .iter()
        .map(|record| Scored { record, score: item_review_score(record, today) })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Picks the stalest index category (random among ties) and returns its top
/// problems by recommendation score. Falls back to a random sample of the
/// working set when no category has members.
pub fn select_recommended<'a, R: Rng + ?Sized>(
    records: &'a [ProblemRecord],
    index: &ClassificationIndex,
    today: NaiveDate,
    rng: &mut R,
) -> Recommendation<'a> {
    let scores = category_staleness_scores(records, Membership::Index(index), today);

    let Some(max_score) = scores.values().copied().max_by(f64::total_cmp) else {
        warn!("No scored categories, sampling randomly");
        let picks = records
            .choose_multiple(rng, RECOMMEND_TOP_N.min(records.len()))
            .collect();
        return Recommendation::Random { picks };
    };

    let tied: Vec<&str> = scores
        .iter()
        .filter(|(_, score)| **score == max_score)
        .map(|(name, _)| name.as_str())
        .collect();
    // `tied` always holds the category that produced `max_score`
    let name = tied.choose(rng).copied().unwrap_or_default().to_string();
    debug!("Top staleness {} shared by {:?}, chose {:?}", max_score, tied, name);

    let ids = index.problems_in(&name);
    let mut picks: Vec<Scored> = records
        .iter()
        .filter(|r| ids.binary_search(&r.id).is_ok())
        .map(|record| Scored { record, score: item_recommendation_score(record, today) })
        .collect();
    picks.sort_by(|a, b| b.score.total_cmp(&a.score));
    picks.truncate(RECOMMEND_TOP_N);

    info!(
        "Recommending {:?} (staleness {}): {:?}",
        name,
        max_score,
        picks.iter().map(|s| s.record.id).collect::<Vec<_>>()
    );
    Recommendation::Category { name, staleness: max_score, picks }
}

// --- Internal Algorithm Logic ---

/// Ideal gap before the next review after `times` repetitions.
pub fn ideal_interval(times: i64) -> i64 {
    if times <= 0 {
        return 0;
    }
    let step = (times - 1).min(REVIEW_LADDER_DAYS.len() as i64 - 1) as usize;
    REVIEW_LADDER_DAYS[step]
}

/// Grows with ln(days overdue + 1), never below 1.
pub fn forget_factor(days_since_last: i64, ideal_interval: i64) -> f64 {
    let overdue = days_since_last.saturating_sub(ideal_interval).max(1);
    ((overdue + 1) as f64).ln().max(FORGET_FACTOR_FLOOR)
}

fn staleness(members: &[&ProblemRecord], today: NaiveDate) -> Option<f64> {
    let oldest = members.iter().map(|r| r.date).min()?;
    let total_seconds: i64 = members.iter().map(|r| r.time_cost_in_seconds()).sum();
    let avg_seconds = total_seconds as f64 / members.len() as f64;

    let time_part = (avg_seconds / STALENESS_TIME_CEILING_SECONDS * STALENESS_PART_MAX)
        .min(STALENESS_PART_MAX);
    let days_old = (today - oldest).num_days();
    let age_part =
        (days_old as f64 / STALENESS_AGE_CEILING_DAYS * STALENESS_PART_MAX).min(STALENESS_PART_MAX);

    Some((time_part + age_part) / 2.0)
}

fn mean_review(members: &[&ProblemRecord], today: NaiveDate) -> Option<f64> {
    if members.is_empty() {
        return None;
    }
    let total: f64 = members.iter().map(|r| item_review_score(r, today)).sum();
    Some(total / members.len() as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        parse_date("2024-06-30").unwrap()
    }

    fn record(id: i64, days_ago: i64, difficulty: &str, time_cost: &str, times: i64, tag: &str) -> ProblemRecord {
        ProblemRecord {
            difficulty: difficulty.to_string(),
            time_cost: time_cost.to_string(),
            times,
            tag: tag.to_string(),
            ..ProblemRecord::new(id, today() - chrono::Duration::days(days_ago))
        }
    }

    #[test]
    fn ladder_follows_repetitions() {
        assert_eq!(ideal_interval(0), 0);
        assert_eq!(ideal_interval(-3), 0);
        assert_eq!(ideal_interval(1), 1);
        assert_eq!(ideal_interval(3), 4);
        assert_eq!(ideal_interval(5), 15);
        assert_eq!(ideal_interval(40), 15);
    }

    #[test]
    fn forget_factor_floors_at_one() {
        assert_eq!(forget_factor(0, 0), 1.0);
        assert_eq!(forget_factor(-5, 1), 1.0);
        assert_eq!(forget_factor(2, 0), 3f64.ln());
        assert!((forget_factor(20, 1) - 20f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn fresh_easy_problem_scores_baseline() {
        let r = record(1, 0, "easy", "0:00", 1, "array");
        assert_eq!(item_review_score(&r, today()), 1.0);
    }

    #[test]
    fn fresh_hard_problem_caps_time_factor() {
        let r = record(1, 0, "Hard", "20:00", 1, "graph");
        assert_eq!(r.time_cost_in_seconds(), 1200);
        assert_eq!(item_review_score(&r, today()), 7.0);
    }

    #[test]
    fn overdue_medium_problem_grows_logarithmically() {
        // times 2 => ideal 2 days; 12 days since => overdue 10 => ln(11)
        let r = record(1, 12, "medium", "3:00", 2, "dp");
        let expected = round2(11f64.ln() * 1.5 + 3.0);
        assert_eq!(item_review_score(&r, today()), expected);
    }

    #[test]
    fn garbled_time_and_unknown_difficulty_are_neutral() {
        let r = record(1, 0, "???", "ab:cd", 1, "misc");
        assert_eq!(item_review_score(&r, today()), 1.0);
    }

    #[test]
    fn recommendation_score_hits_both_caps() {
        let r = record(1, 30, "easy", "30:00", 1, "array");
        assert_eq!(item_recommendation_score(&r, today()), 10.0);

        let r = record(2, 90, "easy", "90:00", 1, "array");
        assert_eq!(item_recommendation_score(&r, today()), 10.0);
    }

    #[test]
    fn recommendation_score_is_proportional() {
        let r = record(1, 6, "easy", "9:00", 1, "array");
        // 540/1800*5 = 1.5, 6/30*5 = 1.0
        assert_eq!(item_recommendation_score(&r, today()), 2.5);
    }

    #[test]
    fn staleness_blends_time_and_oldest_age() {
        let records = vec![
            record(1, 15, "easy", "10:00", 1, "tree"),
            record(2, 3, "easy", "20:00", 1, "tree"),
            record(3, 0, "easy", "0:00", 1, "heap"),
        ];
        let scores = category_staleness_scores(&records, Membership::CurrentTag, today());

        // tree: avg 900s => 5.0; oldest 15 days => 5.0
        assert_eq!(scores["tree"], 5.0);
        assert_eq!(scores["heap"], 0.0);
    }

    #[test]
    fn staleness_omits_empty_categories() {
        let mut index = ClassificationIndex::new();
        index.add(1, "tree");
        index.add(99, "ghost");
        let records = vec![record(1, 60, "easy", "60:00", 1, "tree")];

        let scores = category_staleness_scores(&records, Membership::Index(&index), today());
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["tree"], 10.0);

        assert!(category_staleness_scores(&[], Membership::CurrentTag, today()).is_empty());
    }

    #[test]
    fn blank_tags_are_not_a_category() {
        let records = vec![record(1, 0, "easy", "1:00", 1, " ")];
        assert!(category_review_scores(&records, Membership::CurrentTag, today()).is_empty());
    }

    #[test]
    fn review_scores_average_items() {
        let records = vec![
            record(1, 0, "easy", "0:00", 1, "dp"),
            record(2, 0, "hard", "20:00", 1, "dp"),
        ];
        let scores = category_review_scores(&records, Membership::CurrentTag, today());
        assert_eq!(scores["dp"], 4.0);
    }

    #[test]
    fn index_view_counts_every_membership() {
        let mut index = ClassificationIndex::new();
        index.add(1, "dp");
        index.add(1, "greedy");
        let records = vec![record(1, 0, "easy", "0:00", 1, "dp")];

        let by_index = category_review_scores(&records, Membership::Index(&index), today());
        let by_tag = category_review_scores(&records, Membership::CurrentTag, today());
        assert_eq!(by_index.keys().collect::<Vec<_>>(), vec!["dp", "greedy"]);
        assert_eq!(by_tag.keys().collect::<Vec<_>>(), vec!["dp"]);
    }

    #[test]
    fn score_table_is_sorted_by_staleness() {
        let records = vec![
            record(1, 0, "easy", "0:00", 1, "fresh"),
            record(2, 30, "easy", "30:00", 1, "stale"),
        ];
        let table = category_score_table(&records, Membership::CurrentTag, today());
        assert_eq!(table[0].name, "stale");
        assert_eq!(table[0].staleness, 10.0);
        assert_eq!(table[1].name, "fresh");
        assert_eq!(table[1].problems, 1);
    }

    #[test]
    fn rank_by_review_puts_most_urgent_first() {
        let records = vec![
            record(1, 0, "easy", "0:00", 1, "a"),
            record(2, 40, "hard", "10:00", 1, "a"),
        ];
        let ranked = rank_by_review(&records, today());
        assert_eq!(ranked[0].record.id, 2);
        assert_eq!(ranked[1].score, 1.0);
    }

    #[test]
    fn recommends_top_three_of_stalest_category() {
        let mut index = ClassificationIndex::new();
        let records: Vec<ProblemRecord> = (1..=5)
            .map(|id| record(id, id * 5, "medium", "10:00", 1, "graph"))
            .chain(std::iter::once(record(50, 0, "easy", "1:00", 1, "array")))
            .collect();
        for r in &records {
            index.add(r.id, &r.tag);
        }

        let mut rng = StdRng::seed_from_u64(7);
        let rec = select_recommended(&records, &index, today(), &mut rng);

        assert_eq!(rec.category(), Some("graph"));
        let ids: Vec<i64> = rec.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[test]
    fn recommendation_returns_fewer_than_three_when_category_is_small() {
        let mut index = ClassificationIndex::new();
        index.add(1, "bits");
        let records = vec![record(1, 3, "easy", "2:00", 1, "bits")];

        let mut rng = StdRng::seed_from_u64(1);
        let rec = select_recommended(&records, &index, today(), &mut rng);
        assert_eq!(rec.records().len(), 1);
    }

    #[test]
    fn ties_are_broken_among_maximal_categories() {
        let mut index = ClassificationIndex::new();
        index.add(1, "a");
        index.add(2, "b");
        index.add(3, "c");
        let records = vec![
            record(1, 10, "easy", "5:00", 1, "a"),
            record(2, 10, "easy", "5:00", 1, "b"),
            record(3, 0, "easy", "0:00", 1, "c"),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rec = select_recommended(&records, &index, today(), &mut rng);
            assert!(matches!(rec.category(), Some("a") | Some("b")));
        }
    }

    #[test]
    fn near_equal_staleness_is_not_a_tie() {
        let mut index = ClassificationIndex::new();
        index.add(1, "a");
        index.add(2, "b");
        // a: 1s average => 1/1800*10/2 ~ 0.0028; b: 0.0
        let records = vec![
            record(1, 0, "easy", "0:01", 1, "a"),
            record(2, 0, "easy", "0:00", 1, "b"),
        ];

        let scores = category_staleness_scores(&records, Membership::Index(&index), today());
        assert!(scores["a"] > scores["b"]);
        assert!(scores["a"] < 0.005);

        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rec = select_recommended(&records, &index, today(), &mut rng);
            assert_eq!(rec.category(), Some("a"));
        }
    }

    #[test]
    fn category_review_mean_is_unrounded() {
        // 1.0 and 1.05 (3s time factor) average to 1.025
        let records = vec![
            record(1, 0, "easy", "0:00", 1, "dp"),
            record(2, 0, "easy", "0:03", 1, "dp"),
        ];
        let scores = category_review_scores(&records, Membership::CurrentTag, today());
        assert!((scores["dp"] - 1.025).abs() < 1e-9);
    }

    #[test]
    fn empty_index_falls_back_to_random_sample() {
        let index = ClassificationIndex::new();
        let mut rng = StdRng::seed_from_u64(3);

        let records: Vec<ProblemRecord> =
            (1..=5).map(|id| record(id, 1, "easy", "1:00", 1, "x")).collect();
        let rec = select_recommended(&records, &index, today(), &mut rng);
        assert!(rec.category().is_none());
        assert_eq!(rec.records().len(), 3);

        let few = &records[..2];
        assert_eq!(select_recommended(few, &index, today(), &mut rng).records().len(), 2);
        assert!(select_recommended(&[], &index, today(), &mut rng).records().is_empty());
    }
}
