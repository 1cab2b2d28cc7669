//! Builtin Category Table
//!
//! The component layout of the front-end this tool was first used on.
//! Used whenever `reshelf.toml` does not replace it.

use serde::{Deserialize, Serialize};

/// File extension of catalogued component files
pub const DEFAULT_EXTENSION: &str = ".tsx";

/// Builtin category table, in migration order
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "brand",
        files: &[
            "AllAssetsDashboard.tsx",
            "AssetAccessBadge.tsx",
            "AssetOwnershipBanner.tsx",
            "AssetProgressBadge.tsx",
            "AssetResultsPageNew.tsx",
            "BrandAssetDetail.tsx",
            "BrandAssetsViewSimple.tsx",
            "BrandLibraryNew.tsx",
            "BrandMatrixView.tsx",
            "BrandOverview.tsx",
            "YourBrandStartPage.tsx",
            "QualityProgressBar.tsx",
        ],
    },
    BuiltinCategory {
        name: "research",
        files: &[
            "CrossTargetResearchPanel.tsx",
            "ResearchApproachSelection.tsx",
            "ResearchDashboard.tsx",
            "ResearchHubWithTargets.tsx",
            "ResearchMethodCard.tsx",
            "ResearchMethodsDashboard.tsx",
            "ResearchOptionsView.tsx",
            "ResearchPlansSectionGamified.tsx",
            "ResearchTargetSelector.tsx",
            "ResearchTemplates.tsx",
            "ResearchToolComparison.tsx",
            "ResearchToolNav.tsx",
            "ResearchWorkflow.tsx",
            "SessionNavigator.tsx",
            "SessionOutcomeHeader.tsx",
            "StrategicResearchPlanner.tsx",
        ],
    },
    BuiltinCategory {
        name: "persona",
        files: &[
            "PersonaDetail.tsx",
            "PersonaResearchMethods.tsx",
            "PersonasSection.tsx",
        ],
    },
    BuiltinCategory {
        name: "strategy",
        files: &["StrategyHubSection.tsx"],
    },
    BuiltinCategory {
        name: "foundation",
        files: &[
            "KnowledgeLibrary.tsx",
            "ProductsServices.tsx",
            "TrendLibrary.tsx",
        ],
    },
    BuiltinCategory {
        name: "layout",
        files: &[
            "Dashboard.tsx",
            "DashboardView.tsx",
            "EnhancedSidebarSimple.tsx",
            "PageHeader.tsx",
        ],
    },
    BuiltinCategory {
        name: "shared",
        files: &["ErrorBoundary.tsx"],
    },
];

/// Static category definition
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// Category name, also the destination folder name
    pub name: &'static str,
    /// Component file names, in migration order
    pub files: &'static [&'static str],
}

/// Runtime category definition
///
/// Built from the builtin table or a `[[migrate.category]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    #[serde(default)]
    pub files: Vec<String>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, files: &[&str]) -> Self {
        Self {
            name: name.into(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self::new(builtin.name, builtin.files)
    }
}

/// Strip the extension from a catalogued file name.
///
/// `PersonaDetail.tsx` -> `PersonaDetail`. Names without a dot are returned as-is.
pub fn component_name(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    }
}
