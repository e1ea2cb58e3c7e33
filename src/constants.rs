// src/constants.rs

// --- Review Interval Ladder ---
// Ideal gap (days) before the n-th review, indexed by `times - 1`.
pub const REVIEW_LADDER_DAYS: [i64; 5] = [1, 2, 4, 7, 15];

// --- Difficulty Weights ---
pub const DIFFICULTY_WEIGHT_EASY: f64 = 1.0;
pub const DIFFICULTY_WEIGHT_MEDIUM: f64 = 1.5;
pub const DIFFICULTY_WEIGHT_HARD: f64 = 2.0;
pub const DIFFICULTY_WEIGHT_UNKNOWN: f64 = 1.0;

// --- Review Score ---
pub const FORGET_FACTOR_FLOOR: f64 = 1.0;
pub const TIME_FACTOR_SECONDS_PER_POINT: f64 = 60.0;
pub const TIME_FACTOR_CAP: f64 = 5.0;

// --- Recommendation Score (per item, 0-10) ---
pub const RECOMMEND_TIME_CEILING_SECONDS: f64 = 1800.0; // 30 minutes
pub const RECOMMEND_DATE_CEILING_DAYS: f64 = 30.0;
pub const RECOMMEND_PART_MAX: f64 = 5.0;

// --- Category Staleness (0-10) ---
pub const STALENESS_TIME_CEILING_SECONDS: f64 = 1800.0; // 30 minutes
pub const STALENESS_AGE_CEILING_DAYS: f64 = 30.0;
pub const STALENESS_PART_MAX: f64 = 10.0;

// --- Selection ---
pub const RECOMMEND_TOP_N: usize = 3;

// --- Storage ---
pub const RECORDS_FILE_NAME: &str = "leetcode_list.json";
pub const INDEX_FILE_NAME: &str = "classification.json";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const APP_NAME: &str = "leetcode-tracker";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIME_COST: &str = "0:00";
pub const DEFAULT_DIFFICULTY: &str = "Unknown";
