use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reshelf_core::config::Config;
use reshelf_core::lint::{History, Rating, Report, Scanner, Severity, AREAS, TARGET_SCORE};
use reshelf_core::migrate::{MigrateOptions, Migrator, MoveStatus};
use reshelf_core::rewrite::MatchMode;
use reshelf_core::splice::{splice_file, SpliceBounds};
use reshelf_core::{ReshelfError, Result};

mod args;
use args::{Cli, Commands, ConfigAction, MatchModeArg, SeverityArg, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let root = resolve_root(cli.root);
    debug!(root = %root.display(), "project root");

    let result = match cli.command {
        Some(Commands::Splice {
            target,
            fragment,
            cut,
            resume,
            dry_run,
        }) => handle_splice(&root, target, fragment, cut, resume, dry_run),
        Some(Commands::Migrate {
            source_dir,
            match_mode,
            force,
            dry_run,
        }) => handle_migrate(&root, source_dir, match_mode, force, dry_run),
        Some(Commands::Check {
            no_save,
            min_severity,
        }) => handle_check(&root, no_save, min_severity),
        Some(Commands::Progress { no_csv }) => handle_progress(&root, no_csv),
        Some(Commands::Categories) => handle_categories(&root),
        Some(Commands::Config { action }) => handle_config(action, &root),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("RESHELF_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_root(cli_root: Option<PathBuf>) -> PathBuf {
    if let Some(root) = cli_root {
        return root;
    }

    if let Ok(root) = std::env::var("RESHELF_ROOT") {
        return PathBuf::from(root);
    }

    PathBuf::from(".")
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "reshelf", &mut io::stdout());
}

fn handle_config(action: ConfigAction, root: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(root)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ReshelfError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(root)?;
            config.set(&key, &value)?;
            config.save(root)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(root)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(root);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(root)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn handle_splice(
    root: &Path,
    target: Option<PathBuf>,
    fragment: Option<PathBuf>,
    cut: Option<usize>,
    resume: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(root)?;

    let target = root.join(target.unwrap_or(config.splice.target));
    let fragment = root.join(fragment.unwrap_or(config.splice.fragment));
    let bounds = match (cut.or(config.splice.cut), resume.or(config.splice.resume)) {
        (Some(cut), Some(resume)) => SpliceBounds::new(cut, resume),
        _ => return Err(ReshelfError::BoundsMissing),
    };

    println!();
    println!("Target: {}", target.display().to_string().cyan());
    println!("Fragment: {}", fragment.display());
    println!(
        "Keep: 1..={} + fragment + {}..end",
        bounds.cut, bounds.resume
    );
    if dry_run {
        println!("{}", "(dry run)".yellow());
    }
    println!();

    let outcome = splice_file(&target, &fragment, bounds, dry_run)?;

    println!("Summary:");
    println!("  Lines before: {}", outcome.lines_before);
    println!("  Kept ahead: {}", outcome.head);
    println!("  Fragment: {}", outcome.fragment_lines);
    println!("  Kept after: {}", outcome.tail);
    println!("  Lines after: {}", outcome.lines_after);

    if outcome.clamped {
        println!();
        println!(
            "{} bounds exceed the file ({} lines), output was clamped.",
            "WARNING:".yellow().bold(),
            outcome.lines_before
        );
    }
    if outcome.duplicated > 0 {
        println!();
        println!(
            "{} {} line(s) appear both before and after the fragment.",
            "WARNING:".yellow().bold(),
            outcome.duplicated
        );
    }

    println!();
    println!("{} {}", "Splice complete:".green(), target.display());

    Ok(())
}

fn handle_migrate(
    root: &Path,
    source_dir: Option<PathBuf>,
    match_mode: Option<MatchModeArg>,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let mut config = Config::load(root)?;
    if let Some(dir) = source_dir {
        config.migrate.source_dir = dir;
    }
    if let Some(mode) = match_mode {
        config.migrate.match_mode = match mode {
            MatchModeArg::Segment => MatchMode::Segment,
            MatchModeArg::Substring => MatchMode::Substring,
        };
    }

    let migrator = Migrator::from_config(root, &config)?;

    println!();
    println!("Source: {}", migrator.source_dir().display().to_string().cyan());
    println!(
        "Categories: {} ({} files)",
        migrator.table().all().len(),
        migrator.table().file_count()
    );
    println!("Match mode: {}", config.migrate.match_mode);
    if dry_run {
        println!("{}", "(dry run)".yellow());
    }
    if force {
        println!("{}", "(force)".yellow());
    }

    for (file, categories) in migrator.table().duplicates() {
        println!(
            "{} {} is listed under {}",
            "WARNING:".yellow().bold(),
            file,
            categories.join(", ")
        );
    }

    let plan = migrator.plan()?;

    let conflicts = plan.conflicts();
    if !conflicts.is_empty() && !force {
        println!();
        for path in &conflicts {
            println!("  {} {}", "[CONFLICT]".red().bold(), path.display());
        }
        println!();
        println!("Nothing was moved. Use --force to overwrite existing destinations.");
        return Err(ReshelfError::Conflict { paths: conflicts });
    }

    println!();
    println!("Moving components...");

    let current = RefCell::new(String::new());
    let on_file = |status: &str, label: &str| {
        if status != "DIR" {
            let category = label.split('/').next().unwrap_or_default();
            if *current.borrow() != category {
                let count = plan.moves_in(category).count();
                println!();
                println!("  {} ({} files):", category.to_uppercase().bold(), count);
                *current.borrow_mut() = category.to_string();
            }
        }
        let status_str = match status {
            "OK" => format!("[{}]", status).green(),
            "DIR" => format!("[{}]", status).blue(),
            "FORCE" => format!("[{}]", status).cyan(),
            "MISSING" | "DUP" => format!("[{}]", status).yellow(),
            _ => format!("[{}]", status).normal(),
        };
        println!("    {} {}", status_str, label);
    };

    let result = migrator.apply(&plan, MigrateOptions { force, dry_run }, Some(&on_file))?;

    println!();
    println!("Summary:");
    println!("  Folders created: {}", result.created_dirs);
    println!("  Moved: {}", result.moved);
    println!("  Imports rewritten: {}", result.rewritten_imports);
    println!("  Not found: {}", result.missing);
    if result.duplicates > 0 {
        println!("  Duplicate listings: {}", result.duplicates);
    }

    let dangling = plan.dangling(force);
    if !dangling.is_empty() {
        println!();
        println!(
            "{} {} import(s) will not resolve after the move:",
            "WARNING:".yellow().bold(),
            dangling.len()
        );
        for d in &dangling {
            let file = d
                .file
                .strip_prefix(migrator.source_dir())
                .unwrap_or(&d.file);
            println!("  {} -> '{}'", file.display(), d.specifier);
        }
    }

    println!();
    if plan.count(MoveStatus::Ready) + plan.count(MoveStatus::Conflict) == 0 {
        println!("{}", "Nothing to move.".yellow());
    } else {
        println!("{}", "Migration complete!".green());
        println!(
            "{} Imports of moved components from other files (e.g. App.tsx) are not updated.",
            "NOTE:".yellow().bold()
        );
    }

    Ok(())
}

fn severity_shown(severity: Severity, min: SeverityArg) -> bool {
    let rank = match severity {
        Severity::Critical => SeverityArg::Critical,
        Severity::Warning => SeverityArg::Warning,
        Severity::Info => SeverityArg::Info,
    };
    rank <= min
}

fn handle_check(root: &Path, no_save: bool, min_severity: SeverityArg) -> Result<()> {
    let config = Config::load(root)?;
    let scanner = Scanner::from_config(root, &config.check)?;

    println!();
    println!("Scanning components for consistency issues...");

    let report = scanner.scan(None)?;

    println!("Found {} component files", report.stats.files_scanned);
    println!();
    println!("{}", "Consistency Report".cyan().bold());
    println!();
    println!("Summary:");
    println!("  Files scanned: {}", report.stats.files_scanned);
    println!("  Total issues: {}", report.stats.total_issues);
    println!("  {}", format!("Critical: {}", report.stats.critical_issues).red());
    println!("  {}", format!("Warnings: {}", report.stats.warning_issues).yellow());
    println!();

    for area in AREAS {
        let issues = report.issues.area(area);
        if issues.is_empty() {
            println!("{} {}: no issues", "[OK]".green(), area.label());
            continue;
        }

        println!("{}: {} issues", area.label().bold(), issues.len());
        for (idx, issue) in issues
            .iter()
            .filter(|i| severity_shown(i.severity, min_severity))
            .enumerate()
        {
            let tag = format!("[{}]", issue.severity);
            let tag = match issue.severity {
                Severity::Critical => tag.red().bold(),
                Severity::Warning => tag.yellow(),
                Severity::Info => tag.blue(),
            };
            println!();
            println!("  {}. {} {}", idx + 1, tag, issue.file);
            println!("     Line: {}", issue.line);
            println!("     Issue: {}", issue.issue);
            println!("     Fix: {}", issue.fix.green());
            if let Some(instances) = &issue.instances {
                println!("     Examples: {}", instances);
            }
        }
        println!();
    }

    println!();
    println!("Consistency Score: {}%", report.consistency_score.to_string().bold());
    let rating = report.rating();
    let message = match rating {
        Rating::Excellent => rating.message().green(),
        Rating::Good | Rating::Fair => rating.message().yellow(),
        Rating::Poor => rating.message().red(),
    };
    println!("  {}", message);

    if !no_save {
        let path = root.join(&config.check.report);
        report.save(&path)?;
        println!();
        println!("{} {}", "Report saved:".green(), path.display());
    }

    if report.has_critical() {
        println!();
        return Err(ReshelfError::CriticalIssues {
            count: report.stats.critical_issues,
        });
    }

    Ok(())
}

fn score_bar(score: u32) -> String {
    "█".repeat((score / 5) as usize)
}

fn handle_progress(root: &Path, no_csv: bool) -> Result<()> {
    let config = Config::load(root)?;
    let report = Report::load(&root.join(&config.check.report))?;

    let history_path = root.join(&config.check.history);
    let mut history = History::load(&history_path)?;
    history.record(&report, Utc::now().date_naive());
    history.save(&history_path)?;

    println!();
    println!("{}", "Consistency Improvement Progress".cyan().bold());
    println!();

    let Some(current) = history.current() else {
        return Ok(());
    };

    println!("Current Status:");
    println!("  Date: {}", current.date);
    println!("  Consistency Score: {}%", current.consistency_score.to_string().bold());
    println!("  Total Issues: {}", current.stats.total_issues);
    println!("  Critical: {}", current.stats.critical_issues);
    println!("  Warnings: {}", current.stats.warning_issues);

    if let (Some(first), Some(progress)) = (history.first(), history.progress()) {
        println!();
        println!("Progress Since Start:");
        println!("  Start Date: {}", first.date);
        println!("  Start Score: {}%", first.consistency_score);
        println!("  Current Score: {}%", current.consistency_score);
        match progress.score_change {
            n if n > 0 => println!("  Improvement: {}", format!("+{}%", n).green()),
            n if n < 0 => println!("  Change: {}", format!("{}%", n).yellow()),
            _ => println!("  Change: No change"),
        }
        let resolved = progress.issues_resolved.to_string();
        if progress.issues_resolved > 0 {
            println!("  Issues Resolved: {}", resolved.green());
        } else {
            println!("  Issues Resolved: {}", resolved.yellow());
        }
    }

    if history.entries().len() >= 3 {
        println!();
        println!("Recent Trend (Last 5 Checks):");
        for entry in history.recent(5) {
            let bar = score_bar(entry.consistency_score);
            let bar = match Rating::from_score(entry.consistency_score) {
                Rating::Excellent => bar.green(),
                Rating::Good => bar.yellow(),
                _ => bar.normal(),
            };
            println!("  {}: {} {}%", entry.date, bar, entry.consistency_score);
        }
    }

    println!();
    println!("Issues by Category (Current):");
    for area in AREAS {
        let count = current.issues.get(area);
        let bar = "█".repeat(count.min(20));
        let bar = match count {
            0 => bar.green(),
            1..=4 => bar.yellow(),
            _ => bar.normal(),
        };
        println!("  {:<12}: {} {}", area.label(), bar, count);
    }

    println!();
    if current.consistency_score >= TARGET_SCORE {
        println!(
            "{}",
            format!("Goal achieved! Consistency score: {}%", current.consistency_score).green()
        );
    } else {
        let remaining = TARGET_SCORE - current.consistency_score;
        println!("Goal: {}% consistency", TARGET_SCORE);
        println!("  Current: {}%", current.consistency_score);
        println!("  Remaining: {}%", remaining);
        println!(
            "  Progress: {}{}",
            score_bar(current.consistency_score),
            "░".repeat(remaining.div_ceil(5) as usize)
        );
    }

    if !no_csv {
        let csv_path = history_path.with_extension("csv");
        std::fs::write(&csv_path, history.to_csv())?;
        println!();
        println!("{} {}", "CSV exported:".green(), csv_path.display());
    }

    Ok(())
}

fn handle_categories(root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let table = config.category_table();

    println!();
    for category in table.all() {
        println!(
            "{} ({} files)",
            category.name.cyan().bold(),
            category.files.len()
        );
        for file in &category.files {
            println!("  {}", file);
        }
        println!();
    }

    for (file, categories) in table.duplicates() {
        println!(
            "{} {} is listed under {}",
            "WARNING:".yellow().bold(),
            file,
            categories.join(", ")
        );
    }

    println!(
        "Total: {} categories, {} files",
        table.all().len(),
        table.file_count()
    );

    Ok(())
}
