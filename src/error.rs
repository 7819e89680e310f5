use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures that stop one source's reconciliation. Recoverable problems never
/// end up here; they go to [`crate::warnings::WarningLog`] instead.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("required input file not found: {}", path.display())]
    FileMissing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid delimited data in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: missing column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::FileMissing { path }
            | SourceError::Io { path, .. }
            | SourceError::Csv { path, .. }
            | SourceError::Json { path, .. }
            | SourceError::MissingColumn { path, .. }
            | SourceError::Malformed { path, .. } => path,
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file_and_column() {
        let err = SourceError::MissingColumn {
            path: PathBuf::from("data/WorldCupMatches2014.csv"),
            column: "Home Team Name".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("WorldCupMatches2014.csv"));
        assert!(msg.contains("Home Team Name"));
        assert_eq!(err.path(), Path::new("data/WorldCupMatches2014.csv"));
    }
}
