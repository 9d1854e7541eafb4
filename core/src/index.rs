use crate::document::{Collection, Document};
use crate::normalizer::Normalizer;
use crate::{query, DocId, IndexError, Term};
use std::collections::{HashMap, HashSet};

/// Term → ids of the documents containing it.
///
/// Built once from a complete collection and read-only afterwards, so a
/// shared reference can serve any number of concurrent searches.
#[derive(Debug)]
pub struct InvertedIndex {
    postings: HashMap<Term, HashSet<DocId>>,
    documents: Collection,
    normalizer: Normalizer,
}

impl InvertedIndex {
    pub fn build<I>(documents: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Document>,
    {
        Self::build_with(Normalizer::default(), documents)
    }

    /// Build with a specific normalizer; queries against the result go
    /// through the same one.
    pub fn build_with<I>(normalizer: Normalizer, documents: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Document>,
    {
        // Ids are validated before any posting exists.
        let documents = Collection::new(documents)?;
        let mut index = Self { postings: HashMap::new(), documents: Collection::default(), normalizer };
        for doc in documents.iter() {
            index.add(doc);
        }
        index.documents = documents;
        tracing::debug!(num_docs = index.num_docs(), num_terms = index.num_terms(), "built inverted index");
        Ok(index)
    }

    fn add(&mut self, doc: &Document) {
        for term in self.normalizer.normalize(doc.lines()) {
            self.postings.entry(term).or_default().insert(doc.id());
        }
    }

    pub fn postings(&self, term: &str) -> Option<&HashSet<DocId>> {
        self.postings.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_docs(&self) -> usize { self.documents.len() }

    pub fn documents(&self) -> &Collection { &self.documents }

    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Ids of the documents containing every query term, ascending.
    pub fn search_ids(&self, query: &str) -> Vec<DocId> {
        query::resolve(self, query)
    }

    /// Like [`search_ids`](Self::search_ids) but resolved to documents.
    pub fn search(&self, query: &str) -> Vec<&Document> {
        self.lookup(&self.search_ids(query))
    }

    /// Resolve ids to documents, keeping their order. Unknown ids are skipped.
    pub fn lookup(&self, ids: &[DocId]) -> Vec<&Document> {
        ids.iter().filter_map(|&id| self.documents.get(id)).collect()
    }
}
