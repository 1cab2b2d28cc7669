//! Category Table
//!
//! Ordered runtime store of category definitions.
//! Order matters: folders are created and files are moved in table order,
//! and import rewrites are applied in the same order.

use std::collections::HashMap;

use super::builtin::{component_name, CategoryDef, BUILTIN_CATEGORIES};
use crate::error::{ReshelfError, Result};

/// Ordered category -> files table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<CategoryDef>,
}

/// One (category, file) pair of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub category: &'a str,
    pub file: &'a str,
}

impl<'a> CatalogEntry<'a> {
    /// File name without extension, as it appears in import specifiers
    pub fn component(&self) -> &'a str {
        component_name(self.file)
    }
}

impl CategoryTable {
    /// Table with the builtin categories only
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN_CATEGORIES.iter().map(CategoryDef::from).collect(),
        }
    }

    /// Empty table
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Build a table from explicit definitions, keeping their order
    pub fn from_defs(defs: Vec<CategoryDef>) -> Self {
        Self::empty().with_config(&defs)
    }

    /// Override with configured categories
    ///
    /// - A category with an existing name replaces its file list in place
    /// - A new category is appended
    pub fn with_config(mut self, defs: &[CategoryDef]) -> Self {
        for def in defs {
            match self.categories.iter_mut().find(|c| c.name == def.name) {
                Some(existing) => existing.files = def.files.clone(),
                None => self.categories.push(def.clone()),
            }
        }
        self
    }

    /// Category and file names must each be a single path segment.
    /// Anything else would resolve a destination outside its folder.
    pub fn validate(&self) -> Result<()> {
        for category in &self.categories {
            if !is_plain_segment(&category.name) {
                return Err(ReshelfError::InvalidConfigValue {
                    key: "migrate.category.name".to_string(),
                    message: format!("'{}' is not a plain folder name", category.name),
                });
            }
            if let Some(file) = category.files.iter().find(|f| !is_plain_segment(f)) {
                return Err(ReshelfError::InvalidConfigValue {
                    key: "migrate.category.files".to_string(),
                    message: format!(
                        "'{}' in '{}' is not a plain file name",
                        file, category.name
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All categories in table order
    pub fn all(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of catalogued files
    pub fn file_count(&self) -> usize {
        self.categories.iter().map(|c| c.files.len()).sum()
    }

    /// Every (category, file) pair in table order
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.categories.iter().flat_map(|c| {
            c.files.iter().map(move |f| CatalogEntry {
                category: c.name.as_str(),
                file: f.as_str(),
            })
        })
    }

    /// Category of a component, looked up by its extension-less name.
    /// The first listing wins when a name is catalogued twice.
    pub fn category_of(&self, component: &str) -> Option<&str> {
        self.entries()
            .find(|e| e.component() == component)
            .map(|e| e.category)
    }

    /// File names listed more than once, with every category listing them
    pub fn duplicates(&self) -> Vec<(String, Vec<String>)> {
        let mut seen: HashMap<&str, Vec<String>> = HashMap::new();
        let mut order = Vec::new();

        for entry in self.entries() {
            let cats = seen.entry(entry.file).or_insert_with(|| {
                order.push(entry.file);
                Vec::new()
            });
            cats.push(entry.category.to_string());
        }

        order
            .into_iter()
            .filter_map(|file| {
                let cats = &seen[file];
                (cats.len() > 1).then(|| (file.to_string(), cats.clone()))
            })
            .collect()
    }
}

fn is_plain_segment(name: &str) -> bool {
    !name.trim().is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_order() {
        let table = CategoryTable::builtin();
        assert_eq!(
            table.names(),
            vec![
                "brand",
                "research",
                "persona",
                "strategy",
                "foundation",
                "layout",
                "shared"
            ]
        );
        assert_eq!(table.file_count(), 40);
        assert!(table.get("persona").is_some());
        assert!(table.get("nonexistent").is_none());
    }

    #[test]
    fn test_entries_follow_table_order() {
        let table = CategoryTable::builtin();
        let first = table.entries().next().unwrap();
        assert_eq!(first.category, "brand");
        assert_eq!(first.file, "AllAssetsDashboard.tsx");
        assert_eq!(first.component(), "AllAssetsDashboard");

        let last = table.entries().last().unwrap();
        assert_eq!(last.category, "shared");
        assert_eq!(last.file, "ErrorBoundary.tsx");
    }

    #[test]
    fn test_category_of() {
        let table = CategoryTable::builtin();
        assert_eq!(table.category_of("PersonasSection"), Some("persona"));
        assert_eq!(table.category_of("Dashboard"), Some("layout"));
        assert_eq!(table.category_of("PersonasSection.tsx"), None);
        assert_eq!(table.category_of("Unknown"), None);
    }

    #[test]
    fn test_with_config_overrides_and_appends() {
        let table = CategoryTable::builtin().with_config(&[
            CategoryDef::new("shared", &["ErrorBoundary.tsx", "EmptyState.tsx"]),
            CategoryDef::new("campaign", &["CampaignWorkspace.tsx"]),
        ]);

        assert_eq!(table.get("shared").unwrap().files.len(), 2);
        assert_eq!(table.names().last(), Some(&"campaign"));
        assert_eq!(table.names()[6], "shared");
    }

    #[test]
    fn test_duplicates() {
        let table = CategoryTable::from_defs(vec![
            CategoryDef::new("a", &["One.tsx", "Two.tsx"]),
            CategoryDef::new("b", &["Two.tsx"]),
        ]);
        let dups = table.duplicates();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "Two.tsx");
        assert_eq!(dups[0].1, vec!["a", "b"]);

        assert!(CategoryTable::builtin().duplicates().is_empty());
    }

    #[test]
    fn test_validate_rejects_path_like_names() {
        assert!(CategoryTable::builtin().validate().is_ok());

        for name in ["", ".", "..", "a/b", "a\\b"] {
            let table = CategoryTable::from_defs(vec![CategoryDef::new(name, &["Keep.tsx"])]);
            let err = table.validate().unwrap_err();
            assert!(matches!(err, ReshelfError::InvalidConfigValue { .. }), "{:?}", name);
        }

        let table = CategoryTable::from_defs(vec![CategoryDef::new("shared", &["../Keep.tsx"])]);
        assert!(table.validate().is_err());
    }
}
