use crate::DocId;
use std::io;
use thiserror::Error;

/// Failures while building an index.
///
/// Searching never fails: a query without terms, or with a term the index
/// has never seen, simply matches nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("duplicate document identifier: {0}")]
    DuplicateIdentifier(DocId),
}

/// Failures while reading or writing raw corpus records.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The title does not carry a numeric identifier, e.g. `"Sonnet 18: ..."`.
    #[error("malformed title: {0:?}")]
    MalformedTitle(String),

    #[error("expected a JSON array of records or a single record object")]
    UnexpectedShape,
}
