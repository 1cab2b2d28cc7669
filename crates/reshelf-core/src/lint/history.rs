//! Score history across `check` runs, with CSV export.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::report::{Report, Stats};
use super::rules::{Area, AREAS};
use crate::error::Result;

/// Entries kept in the history file
pub const HISTORY_LIMIT: usize = 30;

/// Score the progress view measures against
pub const TARGET_SCORE: u32 = 95;

const CSV_HEADER: &str = "Date,ConsistencyScore,TotalIssues,Critical,Warnings,\
                          Spacing,Typography,Colors,Buttons,Components,Layout";

/// Issue count per area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCounts {
    pub spacing: usize,
    pub typography: usize,
    pub colors: usize,
    pub buttons: usize,
    pub components: usize,
    pub layout: usize,
}

impl AreaCounts {
    pub fn get(&self, area: Area) -> usize {
        match area {
            Area::Spacing => self.spacing,
            Area::Typography => self.typography,
            Area::Colors => self.colors,
            Area::Buttons => self.buttons,
            Area::Components => self.components,
            Area::Layout => self.layout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: String,
    pub timestamp: DateTime<Utc>,
    pub consistency_score: u32,
    pub stats: Stats,
    pub issues: AreaCounts,
}

impl HistoryEntry {
    pub fn from_report(report: &Report, date: NaiveDate) -> Self {
        let count = |area| report.issues.area(area).len();
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            timestamp: report.timestamp,
            consistency_score: report.consistency_score,
            stats: report.stats,
            issues: AreaCounts {
                spacing: count(Area::Spacing),
                typography: count(Area::Typography),
                colors: count(Area::Colors),
                buttons: count(Area::Buttons),
                components: count(Area::Components),
                layout: count(Area::Layout),
            },
        }
    }
}

/// Change between the first and the latest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub score_change: i64,
    pub issues_resolved: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load history, empty when the file does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Append a report, dropping the oldest entries past [`HISTORY_LIMIT`]
    pub fn record(&mut self, report: &Report, date: NaiveDate) -> &HistoryEntry {
        self.entries.push(HistoryEntry::from_report(report, date));
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// None until there are at least two entries
    pub fn progress(&self) -> Option<Progress> {
        if self.entries.len() < 2 {
            return None;
        }
        let (first, current) = (self.first()?, self.current()?);
        Some(Progress {
            score_change: current.consistency_score as i64 - first.consistency_score as i64,
            issues_resolved: first.stats.total_issues as i64 - current.stats.total_issues as i64,
        })
    }

    pub fn to_csv(&self) -> String {
        let mut lines = vec![CSV_HEADER.to_string()];
        for entry in &self.entries {
            let mut fields = vec![
                entry.date.clone(),
                entry.consistency_score.to_string(),
                entry.stats.total_issues.to_string(),
                entry.stats.critical_issues.to_string(),
                entry.stats.warning_issues.to_string(),
            ];
            fields.extend(AREAS.iter().map(|a| entry.issues.get(*a).to_string()));
            lines.push(fields.join(","));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::rules::{check_file, Issues};
    use tempfile::TempDir;

    fn report(score_issues: &[&str]) -> Report {
        let mut issues = Issues::default();
        for (i, content) in score_issues.iter().enumerate() {
            check_file(&format!("f{}.tsx", i), content, &mut issues);
        }
        Report::new(4, issues, Utc::now())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_record_and_progress() {
        let mut history = History::default();
        assert!(history.progress().is_none());

        history.record(
            &report(&["<p className=\"text-[#000000]\" />", "max-w-6xl max-w-7xl"]),
            day(1),
        );
        let entry = history.record(&report(&["max-w-6xl max-w-7xl"]), day(2));
        assert_eq!(entry.date, "2025-01-02");
        assert_eq!(entry.issues.layout, 1);
        assert_eq!(entry.consistency_score, 75);

        let progress = history.progress().unwrap();
        assert_eq!(progress.score_change, 25);
        assert_eq!(progress.issues_resolved, 1);
    }

    #[test]
    fn test_history_limit() {
        let mut history = History::default();
        for d in 1..=31 {
            history.record(&report(&[]), day(d));
        }
        history.record(&report(&[]), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(history.entries().len(), HISTORY_LIMIT);
        assert_eq!(history.first().unwrap().date, "2025-01-03");
        assert_eq!(history.recent(2).len(), 2);
        assert_eq!(history.recent(100).len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_csv_export() {
        let mut history = History::default();
        history.record(&report(&["<p className=\"text-[#000000]\" />"]), day(5));
        let csv = history.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Date,ConsistencyScore"));
        assert_eq!(lines[1], "2025-01-05,75,1,1,0,0,0,1,0,0,0");
    }

    #[test]
    fn test_load_save_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("consistency-history.json");
        assert!(History::load(&path).unwrap().is_empty());

        let mut history = History::default();
        history.record(&report(&[]), day(1));
        history.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.trim_start().starts_with('['));
        assert_eq!(History::load(&path).unwrap(), history);
    }
}
