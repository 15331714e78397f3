//! Error types for the search core.
//!
//! Recoverable anomalies (a document without a length entry, an id missing
//! from the registry, a stemmer failure) are not errors; they are reported
//! through `tracing` and execution continues.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ParamError;

/// Result type alias for search core operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("query {query:?} normalized to {tokens} tokens, this operation needs exactly one")]
    InvalidQueryArity { query: String, tokens: usize },

    #[error("invalid BM25 parameters: {0}")]
    InvalidParams(#[from] ParamError),

    #[error("index artifact not found at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("failed to decode index artifact {}: {source}", path.display())]
    ArtifactDecode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to write index artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to read corpus {}: {source}", path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse corpus {}: {source}", path.display())]
    CorpusParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read stopwords {}: {source}", path.display())]
    StopwordsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    /// True for errors caused by the caller's query rather than the index.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, SearchError::InvalidQueryArity { .. } | SearchError::InvalidParams(_))
    }

    /// True when the persisted index could not be read or written.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            SearchError::ArtifactNotFound { .. }
                | SearchError::ArtifactDecode { .. }
                | SearchError::ArtifactWrite { .. }
        )
    }
}
