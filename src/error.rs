use thiserror::Error;

/// Classifies corpus source failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusErrorKind {
    /// The backing file or directory does not exist
    NotFound,
    /// The source exists but could not be opened (permissions, not a file, etc.)
    Unreadable,
    /// Reading failed part-way through the stream
    ReadFailed,
}

/// Typosquat engine error types
#[derive(Error, Debug)]
pub enum SquatError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Corpus source '{source_name}' unavailable: {message}")]
    CorpusUnavailable {
        kind: CorpusErrorKind,
        source_name: String,
        message: String,
    },

    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Scan of '{source_name}' cancelled")]
    Cancelled { source_name: String },

    #[error("Worker scanning '{source_name}' panicked")]
    WorkerPanicked { source_name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl SquatError {
    pub(crate) fn corpus(
        kind: CorpusErrorKind,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::CorpusUnavailable {
            kind,
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error only concerns a single corpus source and other
    /// sources of the same query may still be scanned.
    pub fn is_source_local(&self) -> bool {
        matches!(
            self,
            SquatError::CorpusUnavailable { .. }
                | SquatError::Cancelled { .. }
                | SquatError::WorkerPanicked { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SquatError>;
