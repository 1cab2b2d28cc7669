//! Line-range splicing.
//!
//! Replaces the lines between two 1-based boundaries of a file with a
//! fragment: lines `1..=cut` are kept, then the fragment and a newline,
//! then lines `resume..`. Boundaries are not checked against the structure
//! of the file; out-of-range values clamp like slices.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ReshelfError, Result};

/// Splice boundaries, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceBounds {
    /// Last line kept before the fragment
    pub cut: usize,
    /// First line kept after the fragment
    pub resume: usize,
}

impl SpliceBounds {
    pub fn new(cut: usize, resume: usize) -> Self {
        Self { cut, resume }
    }

    fn validate(&self) -> Result<()> {
        if self.resume == 0 {
            return Err(ReshelfError::InvalidBounds {
                cut: self.cut,
                resume: self.resume,
            });
        }
        Ok(())
    }
}

/// Line accounting for one splice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceOutcome {
    pub lines_before: usize,
    /// Lines kept ahead of the fragment
    pub head: usize,
    /// Lines kept after the fragment
    pub tail: usize,
    pub fragment_lines: usize,
    pub lines_after: usize,
    /// Lines that appear both in head and tail (resume <= cut)
    pub duplicated: usize,
    /// Boundaries fell outside the file and were clamped
    pub clamped: bool,
}

/// Splice `fragment` into `target` text.
pub fn splice_text(
    target: &str,
    fragment: &str,
    bounds: SpliceBounds,
) -> Result<(String, SpliceOutcome)> {
    bounds.validate()?;

    let lines: Vec<&str> = target.split_inclusive('\n').collect();
    let total = lines.len();

    let head_end = bounds.cut.min(total);
    let tail_start = (bounds.resume - 1).min(total);
    let clamped = bounds.cut > total || bounds.resume - 1 > total;

    let mut out = String::with_capacity(target.len() + fragment.len() + 1);
    for line in &lines[..head_end] {
        out.push_str(line);
    }
    out.push_str(fragment);
    out.push('\n');
    for line in &lines[tail_start..] {
        out.push_str(line);
    }

    let outcome = SpliceOutcome {
        lines_before: total,
        head: head_end,
        tail: total - tail_start,
        fragment_lines: fragment.split_inclusive('\n').count().max(1),
        lines_after: out.split_inclusive('\n').count(),
        duplicated: head_end.saturating_sub(tail_start),
        clamped,
    };

    Ok((out, outcome))
}

/// Splice the contents of `fragment_path` into `target_path`, overwriting it.
///
/// Both files are read before anything is written; a missing file aborts
/// the run with the target untouched.
pub fn splice_file(
    target_path: &Path,
    fragment_path: &Path,
    bounds: SpliceBounds,
    dry_run: bool,
) -> Result<SpliceOutcome> {
    for path in [target_path, fragment_path] {
        if !path.is_file() {
            return Err(ReshelfError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let target = fs::read_to_string(target_path)?;
    let fragment = fs::read_to_string(fragment_path)?;

    let (spliced, outcome) = splice_text(&target, &fragment, bounds)?;

    if outcome.clamped {
        warn!(
            cut = bounds.cut,
            resume = bounds.resume,
            lines = outcome.lines_before,
            "splice bounds exceed {}, output clamped",
            target_path.display()
        );
    }
    if outcome.duplicated > 0 {
        warn!(
            duplicated = outcome.duplicated,
            "resume line is not after cut line, lines will be repeated"
        );
    }

    if !dry_run {
        fs::write(target_path, spliced)?;
    }
    debug!(
        target = %target_path.display(),
        before = outcome.lines_before,
        after = outcome.lines_after,
        dry_run,
        "spliced"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line{}\n", i)).collect()
    }

    #[test]
    fn test_splice_replaces_middle() {
        let (out, outcome) = splice_text(&numbered(6), "NEW", SpliceBounds::new(2, 5)).unwrap();
        assert_eq!(out, "line1\nline2\nNEW\nline5\nline6\n");
        assert_eq!(outcome.head, 2);
        assert_eq!(outcome.tail, 2);
        assert_eq!(outcome.duplicated, 0);
        assert!(!outcome.clamped);
    }

    #[test]
    fn test_non_fragment_line_count() {
        let n = 10;
        for (a, b) in [(1, 1), (3, 7), (4, 10), (10, 10)] {
            let (_, outcome) = splice_text(&numbered(n), "X", SpliceBounds::new(a, b)).unwrap();
            assert_eq!(outcome.head + outcome.tail, a + (n - b + 1));
        }
    }

    #[test]
    fn test_equal_bounds_repeat_one_line() {
        let (out, outcome) = splice_text(&numbered(3), "X", SpliceBounds::new(2, 2)).unwrap();
        assert_eq!(out, "line1\nline2\nX\nline2\nline3\n");
        assert_eq!(outcome.duplicated, 1);
    }

    #[test]
    fn test_multiline_fragment_and_crlf() {
        let target = "a\r\nb\r\nc\r\n";
        let (out, outcome) = splice_text(target, "x\ny", SpliceBounds::new(1, 3)).unwrap();
        assert_eq!(out, "a\r\nx\ny\nc\r\n");
        assert_eq!(outcome.fragment_lines, 2);
        assert_eq!(outcome.lines_after, 4);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let (out, outcome) = splice_text(&numbered(3), "X", SpliceBounds::new(9, 20)).unwrap();
        assert_eq!(out, "line1\nline2\nline3\nX\n");
        assert!(outcome.clamped);
        assert_eq!(outcome.tail, 0);
    }

    #[test]
    fn test_zero_resume_rejected() {
        let err = splice_text("a\n", "X", SpliceBounds::new(0, 0)).unwrap_err();
        assert!(matches!(err, ReshelfError::InvalidBounds { .. }));
    }

    #[test]
    fn test_splice_file_overwrites_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("App.tsx");
        let fragment = temp.path().join("fragment.tsx");
        fs::write(&target, numbered(5)).unwrap();
        fs::write(&fragment, "  return <View />;").unwrap();

        let outcome = splice_file(&target, &fragment, SpliceBounds::new(1, 4), false).unwrap();
        assert_eq!(outcome.lines_after, 4);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "line1\n  return <View />;\nline4\nline5\n"
        );
    }

    #[test]
    fn test_splice_file_dry_run_leaves_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("App.tsx");
        let fragment = temp.path().join("fragment.tsx");
        fs::write(&target, numbered(5)).unwrap();
        fs::write(&fragment, "X").unwrap();

        splice_file(&target, &fragment, SpliceBounds::new(1, 4), true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), numbered(5));
    }

    #[test]
    fn test_splice_file_missing_fragment_is_fatal() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("App.tsx");
        fs::write(&target, numbered(5)).unwrap();

        let err = splice_file(
            &target,
            &temp.path().join("missing.tsx"),
            SpliceBounds::new(1, 2),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ReshelfError::FileNotFound { .. }));
        assert_eq!(fs::read_to_string(&target).unwrap(), numbered(5));
    }

    #[test]
    fn test_splice_file_missing_target_is_fatal() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("App.tsx");
        let fragment = temp.path().join("fragment.tsx");
        fs::write(&fragment, "X").unwrap();

        let err = splice_file(&target, &fragment, SpliceBounds::new(1, 2), false).unwrap_err();
        assert!(matches!(err, ReshelfError::FileNotFound { ref path } if *path == target));
        assert!(!target.exists());
        assert_eq!(fs::read_to_string(&fragment).unwrap(), "X");
    }
}
