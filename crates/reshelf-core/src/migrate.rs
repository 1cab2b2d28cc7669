//! Component migration: move catalogued files into category folders and
//! rewrite their imports.
//!
//! A run has two phases. [`Migrator::plan`] reads every source file and
//! rewrites it in memory without touching the disk. [`Migrator::apply`]
//! validates the plan (destinations must be free unless forced), then
//! creates the category folders and commits each move in table order.
//! There is no rollback once commit has started.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::category::CategoryTable;
use crate::config::Config;
use crate::error::{ReshelfError, Result};
use crate::rewrite::{import_specifiers, ImportRewriter, MatchMode, Rewrite};

/// Callback type for file operation progress reporting
pub type FileCallback<'a> = Option<&'a dyn Fn(&str, &str)>;

const INDEX_STEM: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// Source found, destination free
    Ready,
    /// Source found, destination already exists
    Conflict,
    /// Source not found in the flat directory
    Missing,
    /// File already planned under an earlier category
    Duplicate,
}

#[derive(Debug)]
pub struct PlannedMove {
    pub category: String,
    pub file: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: MoveStatus,
    /// Rewritten content, present for Ready and Conflict moves
    pub rewrite: Option<Rewrite>,
}

impl PlannedMove {
    /// Path relative to the source directory, e.g. `persona/PersonaDetail.tsx`
    pub fn label(&self) -> String {
        format!("{}/{}", self.category, self.file)
    }

    fn will_move(&self, force: bool) -> bool {
        match self.status {
            MoveStatus::Ready => true,
            MoveStatus::Conflict => force,
            MoveStatus::Missing | MoveStatus::Duplicate => false,
        }
    }
}

/// Relative import of a moved file that will not resolve after the move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingImport {
    pub file: PathBuf,
    pub specifier: String,
}

#[derive(Debug)]
pub struct MigrationPlan {
    pub source_dir: PathBuf,
    pub categories: Vec<String>,
    pub moves: Vec<PlannedMove>,
    extensions: Vec<String>,
}

impl MigrationPlan {
    pub fn moves_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a PlannedMove> {
        self.moves.iter().filter(move |m| m.category == category)
    }

    pub fn count(&self, status: MoveStatus) -> usize {
        self.moves.iter().filter(|m| m.status == status).count()
    }

    pub fn conflicts(&self) -> Vec<PathBuf> {
        self.moves
            .iter()
            .filter(|m| m.status == MoveStatus::Conflict)
            .map(|m| m.destination.clone())
            .collect()
    }

    /// Relative imports of moved files that will not resolve once the plan
    /// is applied. Informational only.
    pub fn dangling(&self, force: bool) -> Vec<DanglingImport> {
        let moving: Vec<&PlannedMove> =
            self.moves.iter().filter(|m| m.will_move(force)).collect();
        let moved_out: HashSet<PathBuf> = moving.iter().map(|m| normalize(&m.source)).collect();
        let moved_in: HashSet<PathBuf> =
            moving.iter().map(|m| normalize(&m.destination)).collect();

        let exists_after = |path: &Path| {
            let path = normalize(path);
            moved_in.contains(&path) || (path.is_file() && !moved_out.contains(&path))
        };

        let mut dangling = Vec::new();
        for planned in &moving {
            let Some(rewrite) = &planned.rewrite else {
                continue;
            };
            let dir = planned
                .destination
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();

            for specifier in import_specifiers(&rewrite.content) {
                if !(specifier.starts_with("./") || specifier.starts_with("../")) {
                    continue;
                }
                let base = dir.join(specifier);
                let resolved = exists_after(&base)
                    || self.extensions.iter().any(|ext| {
                        exists_after(&with_suffix(&base, ext))
                            || exists_after(&base.join(format!("{}{}", INDEX_STEM, ext)))
                    });
                if !resolved {
                    dangling.push(DanglingImport {
                        file: planned.destination.clone(),
                        specifier: specifier.to_string(),
                    });
                }
            }
        }
        dangling
    }
}

#[derive(Debug, Default)]
pub struct MigrationResult {
    pub created_dirs: usize,
    pub moved: usize,
    pub missing: usize,
    pub duplicates: usize,
    pub rewritten_imports: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
    /// Overwrite destinations that already exist
    pub force: bool,
    /// Plan and report without touching the disk
    pub dry_run: bool,
}

pub struct Migrator {
    source_dir: PathBuf,
    table: CategoryTable,
    rewriter: ImportRewriter,
    extensions: Vec<String>,
}

impl Migrator {
    pub fn new(
        source_dir: PathBuf,
        table: CategoryTable,
        stable: &[String],
        mode: MatchMode,
    ) -> Result<Self> {
        table.validate()?;
        let rewriter = ImportRewriter::new(&table, stable, mode)?;
        Ok(Self {
            source_dir,
            table,
            rewriter,
            extensions: vec![".tsx".to_string(), ".ts".to_string()],
        })
    }

    /// Build a migrator for the project at `root`
    pub fn from_config(root: &Path, config: &Config) -> Result<Self> {
        let mut migrator = Self::new(
            root.join(&config.migrate.source_dir),
            config.category_table(),
            &config.migrate.stable,
            config.migrate.match_mode,
        )?;
        migrator.extensions = config.migrate.extensions.clone();
        Ok(migrator)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Read and rewrite every catalogued file in memory.
    ///
    /// A missing source directory is not an error: every entry is planned
    /// as [`MoveStatus::Missing`] and `apply` still creates the folders.
    pub fn plan(&self) -> Result<MigrationPlan> {
        if !self.source_dir.is_dir() {
            warn!(dir = %self.source_dir.display(), "source directory not found");
        }

        let mut seen = HashSet::new();
        let mut moves = Vec::with_capacity(self.table.file_count());

        for entry in self.table.entries() {
            let source = self.source_dir.join(entry.file);
            let destination = self.source_dir.join(entry.category).join(entry.file);
            if normalize(&destination) == normalize(&source) {
                return Err(ReshelfError::InvalidConfigValue {
                    key: "migrate.category.name".to_string(),
                    message: format!(
                        "'{}' would move {} onto itself",
                        entry.category, entry.file
                    ),
                });
            }

            let (status, rewrite) = if !seen.insert(entry.file) {
                (MoveStatus::Duplicate, None)
            } else if source.is_file() {
                let content = fs::read_to_string(&source)?;
                let rewrite = self.rewriter.rewrite(&content, entry.category);
                let status = if destination.exists() {
                    MoveStatus::Conflict
                } else {
                    MoveStatus::Ready
                };
                (status, Some(rewrite))
            } else {
                (MoveStatus::Missing, None)
            };

            debug!(
                category = entry.category,
                file = entry.file,
                status = ?status,
                "planned"
            );

            moves.push(PlannedMove {
                category: entry.category.to_string(),
                file: entry.file.to_string(),
                source,
                destination,
                status,
                rewrite,
            });
        }

        Ok(MigrationPlan {
            source_dir: self.source_dir.clone(),
            categories: self.table.names().iter().map(|s| s.to_string()).collect(),
            moves,
            extensions: self.extensions.clone(),
        })
    }

    /// Commit a plan
    pub fn apply(
        &self,
        plan: &MigrationPlan,
        options: MigrateOptions,
        on_file: FileCallback<'_>,
    ) -> Result<MigrationResult> {
        let conflicts = plan.conflicts();
        if !conflicts.is_empty() && !options.force {
            return Err(ReshelfError::Conflict { paths: conflicts });
        }

        let mut result = MigrationResult::default();

        for category in &plan.categories {
            let dir = plan.source_dir.join(category);
            if !dir.is_dir() {
                if !options.dry_run {
                    fs::create_dir_all(&dir)?;
                }
                if let Some(f) = on_file {
                    f("DIR", &format!("{}/", category));
                }
                result.created_dirs += 1;
            }
        }

        for planned in &plan.moves {
            let label = planned.label();
            match planned.status {
                MoveStatus::Missing => {
                    warn!(file = %planned.source.display(), "source not found, skipping");
                    if let Some(f) = on_file {
                        f("MISSING", &label);
                    }
                    result.missing += 1;
                }
                MoveStatus::Duplicate => {
                    warn!(file = %planned.file, "already moved under an earlier category");
                    if let Some(f) = on_file {
                        f("DUP", &label);
                    }
                    result.duplicates += 1;
                }
                MoveStatus::Ready | MoveStatus::Conflict => {
                    let Some(rewrite) = &planned.rewrite else {
                        continue;
                    };
                    if !options.dry_run {
                        fs::write(&planned.destination, &rewrite.content)?;
                        fs::remove_file(&planned.source)?;
                    }
                    debug!(
                        from = %planned.source.display(),
                        to = %planned.destination.display(),
                        imports = rewrite.changes.len(),
                        "moved"
                    );
                    if let Some(f) = on_file {
                        let status = if planned.status == MoveStatus::Conflict {
                            "FORCE"
                        } else {
                            "OK"
                        };
                        f(status, &label);
                    }
                    result.moved += 1;
                    result.rewritten_imports += rewrite.changes.len();
                }
            }
        }

        Ok(result)
    }

    /// Plan and commit in one step
    pub fn run(
        &self,
        options: MigrateOptions,
        on_file: FileCallback<'_>,
    ) -> Result<MigrationResult> {
        let plan = self.plan()?;
        self.apply(&plan, options, on_file)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
