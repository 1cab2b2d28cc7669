//! Import path rewriting for relocated components.
//!
//! Rewriting is textual: every rule is a regex find/replace over the whole
//! file. Stable-namespace fixups run first, then one rule per catalogued
//! component in table order. A later rule sees the output of earlier ones.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::category::CategoryTable;
use crate::error::{ReshelfError, Result};

/// Folders that are never relocated; imports into them only gain one `../`.
pub const DEFAULT_STABLE_NAMESPACES: &[&str] = &["ui", "canvases", "services", "brand-assets"];

static SPECIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"from\s+(['"])([^'"\n]+)(['"])"#).unwrap());

/// How a component rule recognizes an import of that component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Specifier must be exactly `./<Name>`
    #[default]
    Segment,
    /// Specifier only has to contain `<Name>` after `./`.
    /// `./BrandOverviewCard` is treated as a reference to `BrandOverview`.
    /// A specifier that is itself a catalogued name is never claimed by a
    /// shorter one (`./ResearchDashboard` is not `Dashboard`).
    Substring,
}

impl std::str::FromStr for MatchMode {
    type Err = ReshelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "segment" => Ok(Self::Segment),
            "substring" => Ok(Self::Substring),
            other => Err(ReshelfError::InvalidConfigValue {
                key: "migrate.match_mode".to_string(),
                message: format!("expected 'segment' or 'substring', got '{}'", other),
            }),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segment => write!(f, "segment"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

/// One import statement changed by a rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportChange {
    pub before: String,
    pub after: String,
}

/// Output of rewriting one file
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub content: String,
    pub changes: Vec<ImportChange>,
}

impl Rewrite {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

struct NamespaceRule {
    namespace: String,
    pattern: Regex,
}

struct ComponentRule {
    category: String,
    component: String,
    pattern: Regex,
}

/// Compiled rewrite rules for one category table
pub struct ImportRewriter {
    mode: MatchMode,
    catalogued: HashSet<String>,
    namespace_rules: Vec<NamespaceRule>,
    component_rules: Vec<ComponentRule>,
}

impl ImportRewriter {
    pub fn new(table: &CategoryTable, stable: &[String], mode: MatchMode) -> Result<Self> {
        let namespace_rules = stable
            .iter()
            .map(|ns| {
                let source = format!(r#"from(\s+)(['"])\./{}/"#, regex::escape(ns));
                Ok(NamespaceRule {
                    namespace: ns.clone(),
                    pattern: compile(&source)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let component_rules = table
            .entries()
            .map(|entry| {
                let name = regex::escape(entry.component());
                let source = match mode {
                    MatchMode::Segment => format!(r#"from(\s+)(['"])\./({})(['"])"#, name),
                    MatchMode::Substring => {
                        format!(r#"from(\s+)(['"])\./([^'"\n]*{}[^'"\n]*)(['"])"#, name)
                    }
                };
                Ok(ComponentRule {
                    category: entry.category.to_string(),
                    component: entry.component().to_string(),
                    pattern: compile(&source)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let catalogued = table.entries().map(|e| e.component().to_string()).collect();

        Ok(Self {
            mode,
            catalogued,
            namespace_rules,
            component_rules,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Rewrite the imports of a file that is moving into `category`.
    pub fn rewrite(&self, content: &str, category: &str) -> Rewrite {
        let mut changes = Vec::new();
        let mut text = content.to_string();

        for rule in &self.namespace_rules {
            text = rule
                .pattern
                .replace_all(&text, |caps: &Captures| {
                    let after = format!("from{}{}../{}/", &caps[1], &caps[2], rule.namespace);
                    record(&mut changes, &caps[0], &after);
                    after
                })
                .into_owned();
        }

        for rule in &self.component_rules {
            text = rule
                .pattern
                .replace_all(&text, |caps: &Captures| {
                    // No backreferences in `regex`: reject mismatched quotes here.
                    if caps[2] != caps[4] {
                        return caps[0].to_string();
                    }
                    if &caps[3] != rule.component.as_str() && self.catalogued.contains(&caps[3]) {
                        return caps[0].to_string();
                    }
                    let target = if rule.category == category {
                        format!("./{}", rule.component)
                    } else {
                        format!("../{}/{}", rule.category, rule.component)
                    };
                    let after = format!("from{}{}{}{}", &caps[1], &caps[2], target, &caps[4]);
                    record(&mut changes, &caps[0], &after);
                    after
                })
                .into_owned();
        }

        Rewrite {
            content: text,
            changes,
        }
    }
}

fn compile(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| ReshelfError::InvalidPattern {
        pattern: source.to_string(),
        message: e.to_string(),
    })
}

fn record(changes: &mut Vec<ImportChange>, before: &str, after: &str) {
    if before != after {
        changes.push(ImportChange {
            before: before.to_string(),
            after: after.to_string(),
        });
    }
}

/// Module specifiers of every `from '<specifier>'` clause, in file order
pub fn import_specifiers(content: &str) -> Vec<&str> {
    SPECIFIER_RE
        .captures_iter(content)
        .filter(|caps| caps[1] == caps[3])
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
        .collect()
}
