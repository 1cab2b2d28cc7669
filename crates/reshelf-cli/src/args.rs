use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "reshelf")]
#[command(about = "Splice, migrate and lint a React component tree")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MatchModeArg {
    /// Specifier must be exactly './Name'
    Segment,
    /// Specifier only has to contain Name (legacy)
    Substring,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace a line range of a file with a fragment
    Splice {
        /// File to splice into (default: [splice].target)
        #[arg(long)]
        target: Option<PathBuf>,

        /// File holding the replacement (default: [splice].fragment)
        #[arg(long)]
        fragment: Option<PathBuf>,

        /// Last line kept before the fragment (1-based)
        #[arg(long)]
        cut: Option<usize>,

        /// First line kept after the fragment (1-based)
        #[arg(long)]
        resume: Option<usize>,

        /// Dry run (don't write the target)
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Move catalogued components into category folders and fix their imports
    Migrate {
        /// Flat component directory (default: [migrate].source_dir)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// How component imports are recognized
        #[arg(long, value_enum)]
        match_mode: Option<MatchModeArg>,

        /// Overwrite destination files that already exist
        #[arg(short, long)]
        force: bool,

        /// Dry run (plan and report only)
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Scan components for design-system consistency issues
    Check {
        /// Don't write the JSON report
        #[arg(long)]
        no_save: bool,

        /// Show issues of this severity and above only
        #[arg(long, value_enum, default_value = "info")]
        min_severity: SeverityArg,
    },

    /// Record the latest report in the history and show the trend
    Progress {
        /// Don't export consistency-history.csv
        #[arg(long)]
        no_csv: bool,
    },

    /// Show the category table
    Categories,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum SeverityArg {
    Critical,
    Warning,
    Info,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., migrate.stable)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., migrate.stable)
        key: String,

        /// Value to set (e.g., "ui,services" or "[ui, services]")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
