//! Conjunctive query resolution.

use crate::{DocId, InvertedIndex};
use std::collections::HashSet;

/// Ids of the documents containing every term of `query`, ascending.
///
/// A query with no terms matches nothing. Evaluation stops as soon as a
/// term is unknown or the running intersection becomes empty.
pub fn resolve(index: &InvertedIndex, query: &str) -> Vec<DocId> {
    let terms = index.normalizer().normalize_line(query);
    let Some((first, rest)) = terms.split_first() else {
        tracing::debug!(query, "query has no terms");
        return Vec::new();
    };

    let Some(postings) = index.postings(first) else {
        tracing::debug!(query, term = %first, "unknown term");
        return Vec::new();
    };
    let mut matching: HashSet<DocId> = postings.clone();

    for term in rest {
        let Some(postings) = index.postings(term) else {
            tracing::debug!(query, term = %term, "unknown term");
            return Vec::new();
        };
        matching.retain(|id| postings.contains(id));
        if matching.is_empty() {
            return Vec::new();
        }
    }

    let mut ids: Vec<DocId> = matching.into_iter().collect();
    ids.sort_unstable();
    tracing::debug!(query, hits = ids.len(), "resolved query");
    ids
}
