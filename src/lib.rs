//! LeetCode practice tracker
//!
//! Records solved problems in a flat JSON file, keeps a bidirectional
//! category index, and scores problems and categories to suggest what to
//! revisit next.

pub mod app;
pub mod classify;
pub mod config;
pub mod constants;
pub mod database;
pub mod display;
pub mod error;
pub mod models;
pub mod pedagogy;
pub mod repository;

pub use app::Tracker;
pub use classify::{ClassificationIndex, ClassifyStore};
pub use config::Config;
pub use display::Printer;
pub use error::{Result, TrackerError};
pub use models::{Difficulty, NewProblem, ProblemEdit, ProblemRecord};
pub use repository::WorkingSet;
