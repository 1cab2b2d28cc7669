pub mod category;
pub mod config;
pub mod error;
pub mod lint;
pub mod migrate;
pub mod rewrite;
pub mod splice;

pub use category::{CatalogEntry, CategoryDef, CategoryTable, BUILTIN_CATEGORIES};
pub use config::{CheckConfig, Config, MigrateConfig, SpliceConfig};
pub use error::{ReshelfError, Result};
pub use lint::{History, Rating, Report, Scanner, Severity};
pub use migrate::{
    DanglingImport, MigrateOptions, MigrationPlan, MigrationResult, Migrator, MoveStatus,
    PlannedMove,
};
pub use rewrite::{ImportChange, ImportRewriter, MatchMode, Rewrite, DEFAULT_STABLE_NAMESPACES};
pub use splice::{splice_file, splice_text, SpliceBounds, SpliceOutcome};
