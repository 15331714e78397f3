//! Keyword search over a small static document collection: an inverted
//! index built once from the corpus, persisted to a single binary artifact,
//! and queried by token overlap or BM25.

pub mod builder;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod scoring;
pub mod tokenizer;

pub use config::Bm25Params;
pub use engine::{ScoredDocument, SearchEngine, MAX_OVERLAP_RESULTS};
pub use error::{Result, SearchError};
pub use index::{DocId, DocIdSet, Document, InvertedIndex};
pub use persist::IndexPaths;
pub use tokenizer::{Normalizer, SnowballStemmer, Stem, StemError};
