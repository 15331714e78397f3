//! Reading the document corpus and the stopword list from disk.

use crate::error::{Result, SearchError};
use crate::Document;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(alias = "documents")]
    movies: Vec<Document>,
}

/// Loads `{"movies": [{"id", "title", "description"}, ...]}`.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|source| SearchError::CorpusRead { path: path.to_path_buf(), source })?;
    let corpus: CorpusFile = serde_json::from_reader(BufReader::new(f))
        .map_err(|source| SearchError::CorpusParse { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), num_docs = corpus.movies.len(), "corpus loaded");
    Ok(corpus.movies)
}

/// Whitespace-separated words, lowercased.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let stopwords_err = |source| SearchError::StopwordsRead { path: path.to_path_buf(), source };
    let mut buf = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut buf))
        .map_err(stopwords_err)?;
    Ok(buf.split_whitespace().map(str::to_lowercase).collect())
}
