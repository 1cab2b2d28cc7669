//! # Category Module
//!
//! Maps destination categories (folders) to the component files that move
//! into them.
//!
//! ## Module layout
//!
//! - `builtin`: the builtin category table
//! - `store`: ordered runtime table, merged with `reshelf.toml`
//!
//! ## Example
//!
//! ```rust
//! use reshelf_core::category::{CategoryDef, CategoryTable};
//!
//! let table = CategoryTable::builtin();
//! assert_eq!(table.category_of("PersonaDetail"), Some("persona"));
//!
//! // Configured categories override builtin ones by name
//! let table = table.with_config(&[CategoryDef::new("shared", &["EmptyState.tsx"])]);
//! assert_eq!(table.category_of("EmptyState"), Some("shared"));
//! assert_eq!(table.category_of("ErrorBoundary"), None);
//! ```

mod builtin;
mod store;

pub use builtin::{
    component_name, BuiltinCategory, CategoryDef, BUILTIN_CATEGORIES, DEFAULT_EXTENSION,
};
pub use store::{CatalogEntry, CategoryTable};
