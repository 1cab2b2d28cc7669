//! Design-system consistency rules.
//!
//! Each rule is a regex check over the whole file. `.` never crosses a
//! newline, so every pattern matches within a single line. The `regex`
//! crate has no lookaround; "not followed by" rules use [`find_after`].

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const HEADER_ANCHOR: &str = "sticky top-0";
const MAX_INSTANCES: usize = 3;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(PX_6, r"px-6");
lazy_regex!(PX_4, r"px-4");
lazy_regex!(PY_3, r"py-3");
lazy_regex!(PY_5, r"py-5");
lazy_regex!(CARD_P5, r"(<Card|CardContent).*p-5");
lazy_regex!(CARD_P7, r"(<Card|CardContent).*p-7");
lazy_regex!(TEXT_SIZE, r"text-(xl|2xl|3xl)");
lazy_regex!(PAGE_TITLE, r#"className="text-3xl font-semibold"#);
lazy_regex!(SECTION_TITLE, r#"className="text-xl font-semibold"#);
lazy_regex!(HEX_COLOR, r"(text|bg|border)-\[#[0-9A-Fa-f]{6}\]");
lazy_regex!(STATUS_GREEN, r"text-green-600");
lazy_regex!(COLORS_STATUS, r"COLORS\.status");
lazy_regex!(ICON_MARGIN, r"(mr-2|ml-2).*Icon|Icon.*(mr-2|ml-2)");
lazy_regex!(MARGIN, r"(mr-2|ml-2)");
lazy_regex!(ICON_H5, r"Button.*h-5 w-5|<.*Icon.*h-5 w-5.*/>");
lazy_regex!(ICON_H6, r"Button.*h-6 w-6");
lazy_regex!(BUTTON_SIZING, r#"Button.*className=".*h-9 px-4"#);
lazy_regex!(TEXT_CENTER, r"text-center");
lazy_regex!(LOADING_DIV, r"isLoading.*<div");
lazy_regex!(PAGE_WRAPPER, r#"className="(h-full overflow-auto|min-h-screen)"#);
lazy_regex!(MAX_W_6XL, r"max-w-6xl");
lazy_regex!(MAX_W_7XL, r"max-w-7xl");

static SEARCH_INPUT: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"<Input.*placeholder="Search"#)
        .case_insensitive(true)
        .build()
        .unwrap()
});

static EMPTY_HINT: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"No.*found|No items|Empty")
        .case_insensitive(true)
        .build()
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Spacing,
    Typography,
    Colors,
    Buttons,
    Components,
    Layout,
}

pub const AREAS: [Area; 6] = [
    Area::Spacing,
    Area::Typography,
    Area::Colors,
    Area::Buttons,
    Area::Components,
    Area::Layout,
];

impl Area {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spacing => "Spacing",
            Self::Typography => "Typography",
            Self::Colors => "Colors",
            Self::Buttons => "Buttons",
            Self::Components => "Components",
            Self::Layout => "Layout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// Where an issue was found: a 1-based line, or a note such as
/// "Multiple locations"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueLine {
    Number(usize),
    Note(String),
}

impl std::fmt::Display for IssueLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Note(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub file: String,
    pub severity: Severity,
    pub issue: String,
    pub line: IssueLine,
    pub fix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<String>,
}

/// Issues grouped by area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issues {
    #[serde(default)]
    pub spacing: Vec<Issue>,
    #[serde(default)]
    pub typography: Vec<Issue>,
    #[serde(default)]
    pub colors: Vec<Issue>,
    #[serde(default)]
    pub buttons: Vec<Issue>,
    #[serde(default)]
    pub components: Vec<Issue>,
    #[serde(default)]
    pub layout: Vec<Issue>,
}

impl Issues {
    pub fn area(&self, area: Area) -> &[Issue] {
        match area {
            Area::Spacing => &self.spacing,
            Area::Typography => &self.typography,
            Area::Colors => &self.colors,
            Area::Buttons => &self.buttons,
            Area::Components => &self.components,
            Area::Layout => &self.layout,
        }
    }

    fn area_mut(&mut self, area: Area) -> &mut Vec<Issue> {
        match area {
            Area::Spacing => &mut self.spacing,
            Area::Typography => &mut self.typography,
            Area::Colors => &mut self.colors,
            Area::Buttons => &mut self.buttons,
            Area::Components => &mut self.components,
            Area::Layout => &mut self.layout,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        AREAS.into_iter().flat_map(move |a| self.area(a).iter())
    }

    pub fn len(&self) -> usize {
        AREAS.iter().map(|a| self.area(*a).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.iter().filter(|i| i.severity == severity).count()
    }
}

/// Collects issues for one file
struct FileCheck<'a> {
    file: &'a str,
    content: &'a str,
    issues: &'a mut Issues,
}

impl FileCheck<'_> {
    fn push(
        &mut self,
        area: Area,
        severity: Severity,
        issue: impl Into<String>,
        line: IssueLine,
        fix: &str,
        instances: Option<String>,
    ) {
        self.issues.area_mut(area).push(Issue {
            file: self.file.to_string(),
            severity,
            issue: issue.into(),
            line,
            fix: fix.to_string(),
            instances,
        });
    }

    fn has(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }

    fn line_at(&self, offset: usize) -> IssueLine {
        IssueLine::Number(self.content[..offset].matches('\n').count() + 1)
    }

    fn first(&self, re: &Regex) -> Option<IssueLine> {
        re.find(self.content).map(|m| self.line_at(m.start()))
    }

    fn instances(&self, re: &Regex) -> (usize, String) {
        let all: Vec<&str> = re.find_iter(self.content).map(|m| m.as_str()).collect();
        let shown = all
            .iter()
            .take(MAX_INSTANCES)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        (all.len(), shown)
    }

    fn spacing(&mut self) {
        if self.has(HEADER_ANCHOR) {
            let header_rules: [(&Regex, Option<&str>, Severity, &str, &str); 4] = [
                (
                    &*PX_6,
                    None,
                    Severity::Critical,
                    "Header uses px-6 instead of px-8",
                    "Replace px-6 with px-8",
                ),
                (
                    &*PX_4,
                    Some(" w-4"),
                    Severity::Critical,
                    "Header uses px-4 instead of px-8",
                    "Replace px-4 with px-8",
                ),
                (
                    &*PY_3,
                    Some(" rounded"),
                    Severity::Warning,
                    "Header uses py-3 instead of py-6 or py-4",
                    "Use py-6 for standard or py-4 for compact",
                ),
                (
                    &*PY_5,
                    None,
                    Severity::Warning,
                    "Header uses py-5 instead of py-6 or py-4",
                    "Use py-6 for standard or py-4 for compact",
                ),
            ];

            for (re, not_followed_by, severity, issue, fix) in header_rules {
                if let Some(offset) = find_after(self.content, HEADER_ANCHOR, re, not_followed_by) {
                    let line = self.line_at(offset);
                    self.push(Area::Spacing, severity, issue, line, fix, None);
                }
            }
        }

        if let Some(line) = self.first(&CARD_P5) {
            self.push(
                Area::Spacing,
                Severity::Warning,
                "Card uses p-5 instead of p-6 or p-4",
                line,
                "Use p-6 for standard or p-4 for compact",
                None,
            );
        }

        if let Some(line) = self.first(&CARD_P7) {
            self.push(
                Area::Spacing,
                Severity::Warning,
                "Card uses p-7 instead of p-6",
                line,
                "Use p-6 for standard cards",
                None,
            );
        }
    }

    fn typography(&mut self) {
        if !self.has("TYPOGRAPHY") {
            if let Some(line) = self.first(&TEXT_SIZE) {
                let (count, shown) = self.instances(&TEXT_SIZE);
                self.push(
                    Area::Typography,
                    Severity::Critical,
                    format!(
                        "Uses hardcoded text sizes without TYPOGRAPHY constant ({} instances)",
                        count
                    ),
                    line,
                    "Import and use TYPOGRAPHY from design-system.ts",
                    Some(shown),
                );
            }
        }

        if let Some(line) = self.first(&PAGE_TITLE) {
            self.push(
                Area::Typography,
                Severity::Warning,
                "Page title uses hardcoded text-3xl font-semibold",
                line,
                "Use TYPOGRAPHY.pageTitle",
                None,
            );
        }

        if let Some(line) = self.first(&SECTION_TITLE) {
            self.push(
                Area::Typography,
                Severity::Warning,
                "Section header uses hardcoded text-xl font-semibold",
                line,
                "Use TYPOGRAPHY.sectionTitle",
                None,
            );
        }
    }

    fn colors(&mut self) {
        if let Some(line) = self.first(&HEX_COLOR) {
            let (count, shown) = self.instances(&HEX_COLOR);
            self.push(
                Area::Colors,
                Severity::Critical,
                format!("Uses {} hardcoded hex color(s)", count),
                line,
                "Use design system colors (text-primary, bg-primary, etc.)",
                Some(shown),
            );
        }

        if !COLORS_STATUS.is_match(self.content) {
            if let Some(line) = self.first(&STATUS_GREEN) {
                self.push(
                    Area::Colors,
                    Severity::Warning,
                    "Uses hardcoded status color (text-green-600)",
                    line,
                    "Use COLORS.status.success.text",
                    None,
                );
            }
        }
    }

    fn buttons(&mut self) {
        if let Some(line) = self.first(&ICON_MARGIN) {
            let (count, _) = self.instances(&MARGIN);
            self.push(
                Area::Buttons,
                Severity::Critical,
                format!("Button icon uses mr-2/ml-2 spacing ({} instances)", count),
                line,
                "Use gap-2 on parent Button, remove mr-2/ml-2 from icon",
                None,
            );
        }

        if let Some(line) = self.first(&ICON_H5) {
            self.push(
                Area::Buttons,
                Severity::Warning,
                "Button uses h-5 w-5 icon instead of h-4 w-4",
                line,
                "Change icon size to h-4 w-4",
                None,
            );
        }

        if let Some(line) = self.first(&ICON_H6) {
            self.push(
                Area::Buttons,
                Severity::Warning,
                "Button uses h-6 w-6 icon instead of h-4 w-4",
                line,
                "Change icon size to h-4 w-4",
                None,
            );
        }

        if let Some(line) = self.first(&BUTTON_SIZING) {
            self.push(
                Area::Buttons,
                Severity::Warning,
                "Button uses custom sizing (h-9 px-4)",
                line,
                "Use standard Button sizes (default, sm, icon)",
                None,
            );
        }
    }

    fn components(&mut self) {
        if !self.has("SearchInput") {
            if let Some(line) = self.first(&SEARCH_INPUT) {
                self.push(
                    Area::Components,
                    Severity::Warning,
                    "Uses custom search input instead of SearchInput component",
                    line,
                    "Use <SearchInput /> component",
                    None,
                );
            }
        }

        if !self.has("EmptyState") && TEXT_CENTER.is_match(self.content) {
            if let Some(line) = self.first(&EMPTY_HINT) {
                self.push(
                    Area::Components,
                    Severity::Info,
                    "Might benefit from EmptyState component",
                    line,
                    "Consider using <EmptyState /> component",
                    None,
                );
            }
        }

        if !self.has("LoadingState") {
            if let Some(line) = self.first(&LOADING_DIV) {
                self.push(
                    Area::Components,
                    Severity::Info,
                    "Uses custom loading state",
                    line,
                    "Consider using <LoadingState /> component",
                    None,
                );
            }
        }
    }

    fn layout(&mut self) {
        if !self.has("LAYOUT_PATTERNS") {
            if let Some(line) = self.first(&PAGE_WRAPPER) {
                self.push(
                    Area::Layout,
                    Severity::Warning,
                    "Uses hardcoded page wrapper instead of LAYOUT_PATTERNS",
                    line,
                    "Use LAYOUT_PATTERNS.fullPage",
                    None,
                );
            }
        }

        if MAX_W_6XL.is_match(self.content) && MAX_W_7XL.is_match(self.content) {
            self.push(
                Area::Layout,
                Severity::Info,
                "File mixes different max-width values",
                IssueLine::Note("Multiple locations".to_string()),
                "Standardize to one max-width pattern per page",
                None,
            );
        }
    }
}

/// Run every rule against one file, appending findings to `issues`.
pub fn check_file(file: &str, content: &str, issues: &mut Issues) {
    let mut check = FileCheck {
        file,
        content,
        issues,
    };
    check.spacing();
    check.typography();
    check.colors();
    check.buttons();
    check.components();
    check.layout();
}

/// Byte offset of the first `needle` match that follows `anchor` on the same
/// line and is not immediately followed by `not_followed_by`.
fn find_after(
    content: &str,
    anchor: &str,
    needle: &Regex,
    not_followed_by: Option<&str>,
) -> Option<usize> {
    let mut line_start = 0;
    for line in content.split_inclusive('\n') {
        if let Some(pos) = line.find(anchor) {
            let rest_start = pos + anchor.len();
            let rest = &line[rest_start..];
            let hit = needle.find_iter(rest).find(|m| match not_followed_by {
                Some(suffix) => !rest[m.end()..].starts_with(suffix),
                None => true,
            });
            if let Some(m) = hit {
                return Some(line_start + rest_start + m.start());
            }
        }
        line_start += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> Issues {
        let mut issues = Issues::default();
        check_file("components/Test.tsx", content, &mut issues);
        issues
    }

    #[test]
    fn test_clean_file_has_no_issues() {
        let issues = check(
            "import { TYPOGRAPHY } from '../constants/design-system';\n\
             export const Page = () => <div className={TYPOGRAPHY.pageTitle}>Hi</div>;\n",
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_header_padding() {
        let issues = check("const a = 1;\n<div className=\"sticky top-0 z-10 px-6 py-5\">\n");
        assert_eq!(issues.spacing.len(), 2);
        assert_eq!(issues.spacing[0].issue, "Header uses px-6 instead of px-8");
        assert_eq!(issues.spacing[0].severity, Severity::Critical);
        assert_eq!(issues.spacing[0].line, IssueLine::Number(2));
        assert_eq!(issues.spacing[1].severity, Severity::Warning);
    }

    #[test]
    fn test_header_not_followed_by() {
        // px-4 used for an icon, py-3 on a rounded element
        let issues = check("<div className=\"sticky top-0\"><Icon className=\"px-4 w-4 py-3 rounded\" /></div>\n");
        assert!(issues.spacing.is_empty());

        let issues = check("<div className=\"sticky top-0 px-4 w-4 px-4 py-3\">\n");
        assert_eq!(issues.spacing.len(), 2);
        assert_eq!(issues.spacing[0].issue, "Header uses px-4 instead of px-8");
    }

    #[test]
    fn test_padding_before_anchor_ignored() {
        let issues = check("<div className=\"px-6 sticky top-0\">\n");
        assert!(issues.spacing.is_empty());
    }

    #[test]
    fn test_typography_instances() {
        let issues = check(
            "<h1 className=\"text-3xl font-semibold\">A</h1>\n\
             <h2 className=\"text-xl\">B</h2>\n\
             <h3 className=\"text-2xl\">C</h3>\n\
             <h4 className=\"text-xl\">D</h4>\n",
        );
        assert_eq!(issues.typography.len(), 2);
        let hardcoded = &issues.typography[0];
        assert_eq!(
            hardcoded.issue,
            "Uses hardcoded text sizes without TYPOGRAPHY constant (4 instances)"
        );
        assert_eq!(
            hardcoded.instances.as_deref(),
            Some("text-3xl, text-xl, text-2xl")
        );
        assert_eq!(issues.typography[1].fix, "Use TYPOGRAPHY.pageTitle");
    }

    #[test]
    fn test_colors() {
        let issues = check("<p className=\"text-[#1FD1B2] bg-[#FFFFFF] text-green-600\" />\n");
        assert_eq!(issues.colors.len(), 2);
        assert_eq!(issues.colors[0].issue, "Uses 2 hardcoded hex color(s)");
        assert_eq!(issues.count(Severity::Critical), 1);

        let issues = check("const c = COLORS.status.success.text; // text-green-600\n");
        assert!(issues.colors.is_empty());
    }

    #[test]
    fn test_buttons() {
        let issues = check(
            "<Button><PlusIcon className=\"mr-2 h-4 w-4\" />Add</Button>\n\
             <Button size=\"icon\"><X className=\"h-5 w-5\" /></Button>\n",
        );
        assert_eq!(issues.buttons.len(), 2);
        assert_eq!(
            issues.buttons[0].issue,
            "Button icon uses mr-2/ml-2 spacing (1 instances)"
        );
        assert_eq!(issues.buttons[1].line, IssueLine::Number(2));
    }

    #[test]
    fn test_component_hints() {
        let issues = check(
            "<Input placeholder=\"search assets\" />\n\
             <div className=\"text-center\">No assets found</div>\n\
             {isLoading && <div>Loading</div>}\n",
        );
        assert_eq!(issues.components.len(), 3);
        assert_eq!(issues.components[0].severity, Severity::Warning);
        assert_eq!(issues.components[1].severity, Severity::Info);
        assert_eq!(issues.components[2].line, IssueLine::Number(3));
    }

    #[test]
    fn test_layout() {
        let issues = check("<div className=\"min-h-screen\"><div className=\"max-w-6xl\" /><div className=\"max-w-7xl\" /></div>\n");
        assert_eq!(issues.layout.len(), 2);
        assert_eq!(
            issues.layout[1].line,
            IssueLine::Note("Multiple locations".to_string())
        );
    }

    #[test]
    fn test_issue_json_shape() {
        let issues = check("<div className=\"max-w-6xl max-w-7xl\" />\n");
        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json["layout"][0]["severity"], "info");
        assert_eq!(json["layout"][0]["line"], "Multiple locations");
        assert!(json["layout"][0].get("instances").is_none());
        assert!(json["spacing"].as_array().unwrap().is_empty());
    }
}
