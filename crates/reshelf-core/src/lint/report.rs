//! Consistency report: scan statistics, issues and the overall score.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rules::{Issues, Severity};
use crate::error::{ReshelfError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub files_scanned: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub stats: Stats,
    pub issues: Issues,
    pub consistency_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn from_score(score: u32) -> Self {
        match score {
            95.. => Self::Excellent,
            85..=94 => Self::Good,
            70..=84 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! Your codebase is highly consistent.",
            Self::Good => "Good! A few improvements needed.",
            Self::Fair => "Room for improvement.",
            Self::Poor => "Needs attention! Many inconsistencies found.",
        }
    }
}

/// Percentage of scanned files without any issue, rounded.
/// An empty scan scores 100.
pub fn consistency_score(files_scanned: usize, files_with_issues: usize) -> u32 {
    if files_scanned == 0 {
        return 100;
    }
    let clean = files_scanned.saturating_sub(files_with_issues) as f64;
    (clean / files_scanned as f64 * 100.0).round() as u32
}

impl Report {
    pub fn new(files_scanned: usize, issues: Issues, timestamp: DateTime<Utc>) -> Self {
        let stats = Stats {
            files_scanned,
            total_issues: issues.len(),
            critical_issues: issues.count(Severity::Critical),
            warning_issues: issues.count(Severity::Warning),
        };
        let files_with_issues = issues
            .iter()
            .map(|i| i.file.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            timestamp,
            stats,
            issues,
            consistency_score: consistency_score(files_scanned, files_with_issues),
        }
    }

    pub fn rating(&self) -> Rating {
        Rating::from_score(self.consistency_score)
    }

    pub fn has_critical(&self) -> bool {
        self.stats.critical_issues > 0
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReshelfError::ReportNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::rules::check_file;
    use tempfile::TempDir;

    #[test]
    fn test_consistency_score() {
        assert_eq!(consistency_score(0, 0), 100);
        assert_eq!(consistency_score(10, 0), 100);
        assert_eq!(consistency_score(10, 10), 0);
        assert_eq!(consistency_score(3, 1), 67);
        assert_eq!(consistency_score(8, 1), 88);
    }

    #[test]
    fn test_rating() {
        assert_eq!(Rating::from_score(100), Rating::Excellent);
        assert_eq!(Rating::from_score(95), Rating::Excellent);
        assert_eq!(Rating::from_score(94), Rating::Good);
        assert_eq!(Rating::from_score(70), Rating::Fair);
        assert_eq!(Rating::from_score(69), Rating::Poor);
    }

    #[test]
    fn test_report_counts_files_once() {
        let mut issues = Issues::default();
        check_file(
            "a.tsx",
            "<p className=\"text-[#000000] max-w-6xl max-w-7xl\" />",
            &mut issues,
        );
        check_file("b.tsx", "const ok = 1;", &mut issues);

        let report = Report::new(4, issues, Utc::now());
        assert_eq!(report.stats.total_issues, 2);
        assert_eq!(report.stats.critical_issues, 1);
        assert_eq!(report.stats.warning_issues, 0);
        assert_eq!(report.consistency_score, 75);
        assert!(report.has_critical());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports/consistency-report.json");
        let report = Report::new(2, Issues::default(), Utc::now());
        report.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"consistencyScore\": 100"));
        assert!(raw.contains("\"filesScanned\": 2"));

        assert_eq!(Report::load(&path).unwrap(), report);
    }

    #[test]
    fn test_load_missing_report() {
        let temp = TempDir::new().unwrap();
        let err = Report::load(&temp.path().join("none.json")).unwrap_err();
        assert!(matches!(err, ReshelfError::ReportNotFound { .. }));
    }
}
