use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReshelfError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Destination already exists: {paths:?}")]
    Conflict { paths: Vec<PathBuf> },

    #[error("Invalid splice bounds: cut={cut}, resume={resume} - resume must be at least 1")]
    InvalidBounds { cut: usize, resume: usize },

    #[error("Splice bounds not configured - pass --cut/--resume or set [splice] in reshelf.toml")]
    BoundsMissing,

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid config value for {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No consistency report found at {path} - run `reshelf check` first")]
    ReportNotFound { path: PathBuf },

    #[error("{count} critical consistency issue(s) found")]
    CriticalIssues { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ReshelfError>;

impl ReshelfError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::Conflict { .. } => 3,
            Self::InvalidBounds { .. } | Self::BoundsMissing => 4,
            Self::ConfigParse { .. } => 5,
            Self::CriticalIssues { .. } => 6,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = ReshelfError::FileNotFound {
            path: PathBuf::from("a.tsx"),
        };
        assert_eq!(missing.exit_code(), 2);

        let bounds = ReshelfError::InvalidBounds { cut: 3, resume: 0 };
        assert_eq!(bounds.exit_code(), 4);

        let io = ReshelfError::Io(std::io::Error::other("boom"));
        assert_eq!(io.exit_code(), 1);
    }
}
