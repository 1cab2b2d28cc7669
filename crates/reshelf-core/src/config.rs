use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{CategoryDef, CategoryTable};
use crate::error::{ReshelfError, Result};
use crate::rewrite::{MatchMode, DEFAULT_STABLE_NAMESPACES};
use crate::splice::SpliceBounds;

const CONFIG_FILE: &str = "reshelf.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# reshelf configuration file
# Location: <project root>/reshelf.toml

[migrate]
# Flat directory holding the components to move
source_dir = "components"

# Folders that are never relocated; imports into them only gain one "../"
stable = ["ui", "canvases", "services", "brand-assets"]

# How component imports are recognized:
#   "segment"   - specifier must be exactly './Name'
#   "substring" - specifier only has to contain Name (legacy, may over-match)
match_mode = "segment"

# Start from the builtin category table; [[migrate.category]] entries
# then override categories by name or append new ones
use_builtin = true

# Extensions tried when checking that moved imports still resolve
extensions = [".tsx", ".ts", ".jsx", ".js"]

# [[migrate.category]]
# name = "campaign"
# files = ["CampaignWorkspace.tsx", "NewCampaignWizard.tsx"]

[splice]
target = "App.tsx"
fragment = "renderInProgressView_NEW.tsx"
# Keep lines 1..=cut, drop everything up to resume, keep resume..end
# cut = 1200
# resume = 1750

[check]
include = "components/**/*.tsx"
exclude = ["node_modules", "ui"]
report = "consistency-report.json"
history = "consistency-history.json"
"#;

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub migrate: MigrateConfig,
    #[serde(default)]
    pub splice: SpliceConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

/// Migration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_stable")]
    pub stable: Vec<String>,

    #[serde(default)]
    pub match_mode: MatchMode,

    #[serde(default = "default_true")]
    pub use_builtin: bool,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default, rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryDef>,
}

/// Splice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpliceConfig {
    #[serde(default = "default_splice_target")]
    pub target: PathBuf,

    #[serde(default = "default_splice_fragment")]
    pub fragment: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<usize>,
}

/// Consistency check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default = "default_include")]
    pub include: String,

    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default = "default_report")]
    pub report: PathBuf,

    #[serde(default = "default_history")]
    pub history: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("components")
}

fn default_stable() -> Vec<String> {
    DEFAULT_STABLE_NAMESPACES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    [".tsx", ".ts", ".jsx", ".js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_splice_target() -> PathBuf {
    PathBuf::from("App.tsx")
}

fn default_splice_fragment() -> PathBuf {
    PathBuf::from("renderInProgressView_NEW.tsx")
}

fn default_include() -> String {
    "components/**/*.tsx".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules".to_string(), "ui".to_string()]
}

fn default_report() -> PathBuf {
    PathBuf::from("consistency-report.json")
}

fn default_history() -> PathBuf {
    PathBuf::from("consistency-history.json")
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            stable: default_stable(),
            match_mode: MatchMode::default(),
            use_builtin: true,
            extensions: default_extensions(),
            categories: Vec::new(),
        }
    }
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            target: default_splice_target(),
            fragment: default_splice_fragment(),
            cut: None,
            resume: None,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            report: default_report(),
            history: default_history(),
        }
    }
}

impl Config {
    /// Load config from the project root, falling back to defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| ReshelfError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to the project root
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        fs::create_dir_all(root)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(root: &Path) -> Result<PathBuf> {
        let path = root.join(CONFIG_FILE);
        fs::create_dir_all(root)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Category table after applying `use_builtin` and configured categories
    pub fn category_table(&self) -> CategoryTable {
        let base = if self.migrate.use_builtin {
            CategoryTable::builtin()
        } else {
            CategoryTable::empty()
        };
        base.with_config(&self.migrate.categories)
    }

    /// Splice bounds, if both are configured
    pub fn splice_bounds(&self) -> Option<SpliceBounds> {
        match (self.splice.cut, self.splice.resume) {
            (Some(cut), Some(resume)) => Some(SpliceBounds::new(cut, resume)),
            _ => None,
        }
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "migrate.source_dir" => self.migrate.source_dir = PathBuf::from(value.trim()),
            "migrate.stable" => self.migrate.stable = parse_string_list(value),
            "migrate.match_mode" => self.migrate.match_mode = value.trim().parse()?,
            "migrate.use_builtin" => self.migrate.use_builtin = parse_bool(key, value)?,
            "migrate.extensions" => self.migrate.extensions = parse_string_list(value),
            "splice.target" => self.splice.target = PathBuf::from(value.trim()),
            "splice.fragment" => self.splice.fragment = PathBuf::from(value.trim()),
            "splice.cut" => self.splice.cut = Some(parse_line(key, value)?),
            "splice.resume" => self.splice.resume = Some(parse_line(key, value)?),
            "check.include" => self.check.include = value.trim().to_string(),
            "check.exclude" => self.check.exclude = parse_string_list(value),
            "check.report" => self.check.report = PathBuf::from(value.trim()),
            "check.history" => self.check.history = PathBuf::from(value.trim()),
            _ => {
                return Err(ReshelfError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let opt = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_default();
        vec![
            (
                "migrate.source_dir".to_string(),
                self.migrate.source_dir.display().to_string(),
            ),
            (
                "migrate.stable".to_string(),
                format!("{:?}", self.migrate.stable),
            ),
            (
                "migrate.match_mode".to_string(),
                self.migrate.match_mode.to_string(),
            ),
            (
                "migrate.use_builtin".to_string(),
                self.migrate.use_builtin.to_string(),
            ),
            (
                "migrate.extensions".to_string(),
                format!("{:?}", self.migrate.extensions),
            ),
            (
                "splice.target".to_string(),
                self.splice.target.display().to_string(),
            ),
            (
                "splice.fragment".to_string(),
                self.splice.fragment.display().to_string(),
            ),
            ("splice.cut".to_string(), opt(self.splice.cut)),
            ("splice.resume".to_string(), opt(self.splice.resume)),
            ("check.include".to_string(), self.check.include.clone()),
            (
                "check.exclude".to_string(),
                format!("{:?}", self.check.exclude),
            ),
            (
                "check.report".to_string(),
                self.check.report.display().to_string(),
            ),
            (
                "check.history".to_string(),
                self.check.history.display().to_string(),
            ),
        ]
    }
}

/// Parse a comma-separated or JSON-like list string
fn parse_string_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .trim()
        .parse()
        .map_err(|_| ReshelfError::InvalidConfigValue {
            key: key.to_string(),
            message: format!("expected true or false, got '{}'", value.trim()),
        })
}

fn parse_line(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ReshelfError::InvalidConfigValue {
            key: key.to_string(),
            message: format!("expected a line number, got '{}'", value.trim()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_string_list_comma() {
        let result = parse_string_list("ui,services");
        assert_eq!(result, vec!["ui", "services"]);
    }

    #[test]
    fn test_parse_string_list_json() {
        let result = parse_string_list(r#"["ui", "brand-assets"]"#);
        assert_eq!(result, vec!["ui", "brand-assets"]);
    }

    #[test]
    fn test_parse_string_list_empty() {
        assert!(parse_string_list("[]").is_empty());
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("migrate.stable", "ui,hooks").unwrap();
        assert_eq!(config.migrate.stable, vec!["ui", "hooks"]);

        config.set("splice.cut", "12").unwrap();
        assert_eq!(config.get("splice.cut").unwrap(), "12");

        config.set("migrate.match_mode", "substring").unwrap();
        assert_eq!(config.migrate.match_mode, MatchMode::Substring);

        assert!(config.set("splice.resume", "abc").is_err());
        assert!(config.set("nope.key", "1").is_err());
        assert!(config.get("nope.key").is_none());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.migrate.source_dir, PathBuf::from("components"));
        assert_eq!(config.migrate.stable, default_stable());
        assert!(config.migrate.use_builtin);
        assert!(config.splice_bounds().is_none());
        assert_eq!(config.check.exclude, vec!["node_modules", "ui"]);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.category_table(), CategoryTable::builtin());
    }

    #[test]
    fn test_load_with_categories() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
[migrate]
use_builtin = false

[[migrate.category]]
name = "campaign"
files = ["CampaignWorkspace.tsx"]

[[migrate.category]]
name = "shared"
files = ["EmptyState.tsx", "ErrorBoundary.tsx"]

[splice]
cut = 10
resume = 20
"#,
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        let table = config.category_table();
        assert_eq!(table.names(), vec!["campaign", "shared"]);
        assert_eq!(table.file_count(), 3);

        let bounds = config.splice_bounds().unwrap();
        assert_eq!(bounds, SpliceBounds::new(10, 20));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[migrate\nsource_dir = 1").unwrap();
        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(err, ReshelfError::ConfigParse { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_init_then_save_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = Config::init(temp.path()).unwrap();
        assert!(path.exists());

        let mut config = Config::load(temp.path()).unwrap();
        config.set("splice.resume", "42").unwrap();
        config.save(temp.path()).unwrap();

        let reloaded = Config::load(temp.path()).unwrap();
        assert_eq!(reloaded.splice.resume, Some(42));
    }
}
