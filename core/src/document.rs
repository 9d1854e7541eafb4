use crate::{DocId, IndexError};
use serde::Serialize;
use std::collections::HashMap;

/// A searchable text. Only `lines` are indexed; `title` is a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    id: DocId,
    title: String,
    lines: Vec<String>,
}

impl Document {
    pub fn new(id: DocId, title: impl Into<String>, lines: Vec<String>) -> Self {
        Self { id, title: title.into(), lines }
    }

    pub fn id(&self) -> DocId { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn lines(&self) -> &[String] { &self.lines }
}

/// Documents with unique ids, kept in the order they were supplied.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    docs: Vec<Document>,
    positions: HashMap<DocId, usize>,
}

impl Collection {
    /// Fails on the first id seen twice.
    pub fn new<I>(documents: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Document>,
    {
        let docs: Vec<Document> = documents.into_iter().collect();
        let mut positions = HashMap::with_capacity(docs.len());
        for (pos, doc) in docs.iter().enumerate() {
            if positions.insert(doc.id, pos).is_some() {
                return Err(IndexError::DuplicateIdentifier(doc.id));
            }
        }
        Ok(Self { docs, positions })
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.positions.get(&id).map(|&pos| &self.docs[pos])
    }

    pub fn contains(&self, id: DocId) -> bool { self.positions.contains_key(&id) }

    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ { self.docs.iter() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}
