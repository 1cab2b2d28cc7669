//! File collection and scanning for the consistency check.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use glob::{MatchOptions, Pattern};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::report::Report;
use super::rules::{check_file, Issues};
use crate::config::CheckConfig;
use crate::error::{ReshelfError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    /// Leading directories of the include glob that contain no wildcard
    base: Vec<String>,
    include: Pattern,
    exclude: Vec<String>,
}

impl Scanner {
    /// `include` is a glob relative to `root`; `exclude` lists directory
    /// names skipped at any depth.
    pub fn new(root: PathBuf, include: &str, exclude: &[String]) -> Result<Self> {
        let base = literal_prefix(include);
        let include = Pattern::new(include).map_err(|e| ReshelfError::InvalidPattern {
            pattern: include.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            root,
            base,
            include,
            exclude: exclude.to_vec(),
        })
    }

    pub fn from_config(root: &Path, config: &CheckConfig) -> Result<Self> {
        Self::new(root.to_path_buf(), &config.include, &config.exclude)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclude
                .iter()
                .any(|name| entry.file_name().to_string_lossy() == name.as_str())
    }

    /// Directory the walk starts from: the root joined with the glob's
    /// literal prefix. `None` when that directory is missing or excluded.
    fn walk_start(&self) -> Option<PathBuf> {
        if self.base.iter().any(|seg| self.exclude.contains(seg)) {
            return None;
        }
        let start = self.base.iter().fold(self.root.clone(), |p, seg| p.join(seg));
        start.is_dir().then_some(start)
    }

    /// Matching files, relative to the root with `/` separators, sorted
    pub fn files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let Some(start) = self.walk_start() else {
            debug!(include = %self.include, "nothing to walk");
            return Ok(files);
        };

        for entry in WalkDir::new(&start)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if self.include.matches_with(&relative, MATCH_OPTIONS) {
                files.push(relative);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Scan every matching file and build a report
    pub fn scan(&self, on_file: Option<&dyn Fn(&str)>) -> Result<Report> {
        let files = self.files()?;
        let mut issues = Issues::default();

        for file in &files {
            let content = fs::read_to_string(self.root.join(file))?;
            let before = issues.len();
            check_file(file, &content, &mut issues);
            debug!(file = %file, issues = issues.len() - before, "scanned");
            if let Some(f) = on_file {
                f(file);
            }
        }

        Ok(Report::new(files.len(), issues, Utc::now()))
    }
}

fn literal_prefix(pattern: &str) -> Vec<String> {
    let segments: Vec<&str> = pattern.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];
    dirs.iter()
        .take_while(|seg| !seg.contains(['*', '?', '[']))
        .filter(|seg| !seg.is_empty() && **seg != ".")
        .map(|seg| seg.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner(root: &Path) -> Scanner {
        Scanner::from_config(root, &CheckConfig::default()).unwrap()
    }

    #[test]
    fn test_files_respect_glob_and_exclusions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/Dashboard.tsx", "");
        write(root, "components/persona/PersonaDetail.tsx", "");
        write(root, "components/ui/button.tsx", "");
        write(root, "components/node_modules/x/index.tsx", "");
        write(root, "components/helpers.ts", "");
        write(root, "App.tsx", "");

        let files = scanner(root).files().unwrap();
        assert_eq!(
            files,
            vec![
                "components/Dashboard.tsx",
                "components/persona/PersonaDetail.tsx"
            ]
        );
    }

    #[test]
    fn test_scan_builds_report() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/Clean.tsx", "export const Clean = 1;\n");
        write(
            root,
            "components/Header.tsx",
            "<header className=\"sticky top-0 px-6 py-6\">\n",
        );

        let report = scanner(root).scan(None).unwrap();
        assert_eq!(report.stats.files_scanned, 2);
        assert_eq!(report.stats.critical_issues, 1);
        assert_eq!(report.consistency_score, 50);
        assert_eq!(report.issues.spacing[0].file, "components/Header.tsx");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Scanner::new(PathBuf::from("."), "components/[", &[]).unwrap_err();
        assert!(matches!(err, ReshelfError::InvalidPattern { .. }));
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(literal_prefix("components/**/*.tsx"), vec!["components"]);
        assert_eq!(literal_prefix("src/components/*.tsx"), vec!["src", "components"]);
        assert!(literal_prefix("**/*.tsx").is_empty());
        assert!(literal_prefix("*.tsx").is_empty());
    }

    #[test]
    fn test_walk_starts_at_glob_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/Dashboard.tsx", "");
        write(root, "dist/components/Copy.tsx", "");

        let scanner = scanner(root);
        assert_eq!(scanner.walk_start(), Some(root.join("components")));
        assert_eq!(scanner.files().unwrap(), vec!["components/Dashboard.tsx"]);

        fs::remove_dir_all(root.join("components")).unwrap();
        assert_eq!(scanner.walk_start(), None);
        assert!(scanner.files().unwrap().is_empty());
    }
}
