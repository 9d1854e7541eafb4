//! Lexical search over a fixed collection of short documents.
//!
//! Documents are normalized into terms, the terms are gathered into an
//! inverted index once, and queries are answered by intersecting posting
//! sets (every query term must be present in a match).

pub mod corpus;
pub mod document;
pub mod error;
pub mod index;
pub mod normalizer;
pub mod query;

pub use document::{Collection, Document};
pub use error::{CorpusError, IndexError};
pub use index::InvertedIndex;
pub use normalizer::{normalize, Normalizer, NormalizerConfig};

pub type DocId = u32;
/// A normalized (lower-cased, punctuation-stripped, stemmed) word.
pub type Term = String;
