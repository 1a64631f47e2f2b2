use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading corpora, building indices and persisting them.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("parent directory of {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid index structure: {0}")]
    Structural(#[from] ValidationError),

    #[error("corrupt index: {0}")]
    Corrupt(String),

    #[error("unsupported codec: {0:?} (expected \"text\" or \"binary\")")]
    UnsupportedCodec(String),

    #[error("binary format limit exceeded: {0}")]
    SizeLimit(String),

    #[error("malformed index text: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural violations of the term -> postings mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The top-level value is not a mapping at all.
    #[error("expected a mapping of term to postings, got {found}")]
    NotAMapping { found: &'static str },

    #[error("postings for term {term:?} must be a list, got {found}")]
    PostingsNotAList { term: String, found: &'static str },

    #[error("posting {value} for term {term:?} is not a non-negative integer document id")]
    InvalidPosting { term: String, value: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// True for errors caused by the index file contents rather than the environment.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            IndexError::Corrupt(_) | IndexError::Structural(_) | IndexError::Parse(_)
        )
    }
}
