//! Design-system consistency checking.
//!
//! - `rules`: regex checks grouped by area
//! - `scanner`: file collection and scanning
//! - `report`: statistics, score and the JSON report
//! - `history`: score history and CSV export

mod history;
mod report;
mod rules;
mod scanner;

pub use history::{AreaCounts, History, HistoryEntry, Progress, HISTORY_LIMIT, TARGET_SCORE};
pub use report::{consistency_score, Rating, Report, Stats};
pub use rules::{check_file, Area, Issue, IssueLine, Issues, Severity, AREAS};
pub use scanner::Scanner;
