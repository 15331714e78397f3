use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type DocId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Set of document ids for one token. Membership only, iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocIdSet(HashSet<DocId>);

impl DocIdSet {
    pub fn new() -> Self { Self::default() }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: DocId) -> bool { self.0.insert(id) }

    pub fn contains(&self, id: DocId) -> bool { self.0.contains(&id) }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ { self.0.iter().copied() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<DocId> for DocIdSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    /// token -> ids of documents containing it
    pub postings: HashMap<String, DocIdSet>,
    pub docs: HashMap<DocId, Document>,
    /// doc id -> (token -> raw count)
    pub term_frequencies: HashMap<DocId, HashMap<String, u32>>,
    /// doc id -> number of normalized tokens
    pub doc_lengths: HashMap<DocId, u32>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Registers a document from its already normalized tokens.
    pub fn add_document(&mut self, doc: Document, tokens: &[String]) {
        let doc_id = doc.id;
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
        for token in counts.keys() {
            self.postings.entry(token.clone()).or_default().insert(doc_id);
        }
        self.term_frequencies.insert(doc_id, counts);
        self.doc_lengths.insert(doc_id, tokens.len() as u32);
        self.docs.insert(doc_id, doc);
    }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn doc_ids(&self, token: &str) -> Option<&DocIdSet> { self.postings.get(token) }

    /// Number of documents containing `token`.
    pub fn doc_frequency(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, DocIdSet::len)
    }

    pub fn document(&self, id: DocId) -> Option<&Document> { self.docs.get(&id) }

    /// Raw count of `token` in document `id`, 0 when either is unknown.
    pub fn term_frequency(&self, id: DocId, token: &str) -> u32 {
        self.term_frequencies
            .get(&id)
            .and_then(|counts| counts.get(token))
            .copied()
            .unwrap_or(0)
    }

    pub fn doc_length(&self, id: DocId) -> Option<u32> { self.doc_lengths.get(&id).copied() }

    /// Mean document length, 0.0 for an empty index.
    pub fn average_doc_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        let total: u64 = self.doc_lengths.values().map(|&len| len as u64).sum();
        total as f64 / self.doc_lengths.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn add_document_fills_all_tables() {
        let mut idx = InvertedIndex::new();
        let doc = Document { id: 7, title: "Bear".into(), description: "bear cave".into() };
        idx.add_document(doc.clone(), &toks(&["bear", "bear", "cave"]));

        assert_eq!(idx.document(7), Some(&doc));
        assert_eq!(idx.term_frequency(7, "bear"), 2);
        assert_eq!(idx.term_frequency(7, "cave"), 1);
        assert_eq!(idx.term_frequency(7, "wolf"), 0);
        assert_eq!(idx.term_frequency(8, "bear"), 0);
        assert_eq!(idx.doc_length(7), Some(3));
        assert_eq!(idx.doc_frequency("bear"), 1);
        assert!(idx.doc_ids("cave").unwrap().contains(7));
    }

    #[test]
    fn postings_have_set_semantics() {
        let mut set = DocIdSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn average_length() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.average_doc_length(), 0.0);
        idx.add_document(Document { id: 1, title: String::new(), description: String::new() }, &toks(&["a", "b"]));
        idx.add_document(Document { id: 2, title: String::new(), description: String::new() }, &toks(&["c", "d", "e", "f"]));
        assert_eq!(idx.average_doc_length(), 3.0);
    }
}
