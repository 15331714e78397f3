//! Query engine: owns the normalizer, the loaded index and BM25 parameters.

use crate::builder;
use crate::config::Bm25Params;
use crate::error::Result;
use crate::persist::{load_index, save_index, IndexPaths};
use crate::scoring;
use crate::tokenizer::Normalizer;
use crate::{DocId, Document, InvertedIndex};
use std::collections::{HashMap, HashSet};

/// Token-overlap search stops collecting after this many documents.
pub const MAX_OVERLAP_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub id: DocId,
    pub score: f64,
    pub document: Document,
}

pub struct SearchEngine {
    normalizer: Normalizer,
    params: Bm25Params,
    paths: IndexPaths,
    index: InvertedIndex,
}

impl SearchEngine {
    /// An engine with an empty index. Call [`SearchEngine::rebuild`] or
    /// [`SearchEngine::load`] before querying.
    pub fn new(normalizer: Normalizer, params: Bm25Params, paths: IndexPaths) -> Self {
        Self { normalizer, params, paths, index: InvertedIndex::new() }
    }

    /// An engine backed by the artifact already persisted at `paths`.
    pub fn open(normalizer: Normalizer, params: Bm25Params, paths: IndexPaths) -> Result<Self> {
        let mut engine = Self::new(normalizer, params, paths);
        engine.load()?;
        Ok(engine)
    }

    /// Replaces the in-memory index with the persisted one.
    pub fn load(&mut self) -> Result<()> {
        self.index = load_index(&self.paths)?;
        Ok(())
    }

    /// Builds from `corpus`, replacing the in-memory index, and overwrites the artifact.
    pub fn rebuild(&mut self, corpus: &[Document]) -> Result<()> {
        let index = builder::build(corpus, &self.normalizer);
        save_index(&self.paths, &index)?;
        self.index = index;
        tracing::info!(path = %self.paths.artifact().display(), "index rebuilt");
        Ok(())
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn params(&self) -> Bm25Params { self.params }

    /// Unranked documents sharing at least one token with `query`, at most
    /// [`MAX_OVERLAP_RESULTS`], in discovery order.
    pub fn search(&self, query: &str) -> Result<Vec<Document>> {
        let tokens = self.normalizer.normalize(query);
        tracing::debug!(?tokens, "token-overlap search");

        let mut seen: HashSet<DocId> = HashSet::new();
        let mut found: Vec<DocId> = Vec::new();
        'tokens: for token in &tokens {
            let Some(ids) = self.index.doc_ids(token) else { continue };
            for id in ids.iter() {
                if seen.insert(id) {
                    found.push(id);
                    if found.len() >= MAX_OVERLAP_RESULTS {
                        break 'tokens;
                    }
                }
            }
        }

        Ok(found.into_iter().filter_map(|id| self.hydrate(id).cloned()).collect())
    }

    /// Documents ranked by BM25 summed over every query token, best first,
    /// truncated to `limit`.
    pub fn search_bm25(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        let tokens = self.normalizer.normalize(query);
        tracing::debug!(?tokens, limit, "bm25 search");

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for token in &tokens {
            let Some(ids) = self.index.doc_ids(token) else { continue };
            for id in ids.iter() {
                *scores.entry(id).or_insert(0.0) += scoring::bm25(&self.index, id, token, self.params);
            }
        }

        let mut scored: Vec<ScoredDocument> = scores
            .into_iter()
            .filter_map(|(id, score)| {
                self.hydrate(id).map(|doc| ScoredDocument { id, score, document: doc.clone() })
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        Ok(scored)
    }

    pub fn term_frequency(&self, doc: DocId, term: &str) -> Result<u32> {
        let token = self.normalizer.single_token(term)?;
        Ok(scoring::tf(&self.index, doc, &token))
    }

    pub fn inverse_document_frequency(&self, term: &str) -> Result<f64> {
        let token = self.normalizer.single_token(term)?;
        Ok(scoring::idf(&self.index, &token))
    }

    pub fn tf_idf(&self, doc: DocId, term: &str) -> Result<f64> {
        let token = self.normalizer.single_token(term)?;
        Ok(scoring::tf_idf(&self.index, doc, &token))
    }

    /// BM25 term frequency; `k1`/`b` fall back to the engine's parameters.
    pub fn bm25_tf(&self, doc: DocId, term: &str, k1: Option<f64>, b: Option<f64>) -> Result<f64> {
        let token = self.normalizer.single_token(term)?;
        let params = self.params.with_overrides(k1, b)?;
        Ok(scoring::bm25_tf(&self.index, doc, &token, params))
    }

    pub fn bm25_idf(&self, term: &str) -> Result<f64> {
        let token = self.normalizer.single_token(term)?;
        Ok(scoring::bm25_idf(&self.index, &token))
    }

    pub fn bm25(&self, doc: DocId, term: &str) -> Result<f64> {
        let token = self.normalizer.single_token(term)?;
        Ok(scoring::bm25(&self.index, doc, &token, self.params))
    }

    fn hydrate(&self, id: DocId) -> Option<&Document> {
        let doc = self.index.document(id);
        if doc.is_none() {
            tracing::warn!(doc_id = id, "document id in postings has no registry entry, skipping");
        }
        doc
    }
}
