use crate::error::{Result, SearchError};
use crate::{DocId, DocIdSet, Document, InvertedIndex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const ARTIFACT_FILE: &str = "inverted_index.bin";

/// Location of the index artifact.
pub struct IndexPaths {
    artifact: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(artifact: P) -> Self {
        Self { artifact: artifact.as_ref().to_path_buf() }
    }
    /// `dir/inverted_index.bin`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self { Self::new(dir.as_ref().join(ARTIFACT_FILE)) }
    pub fn artifact(&self) -> &Path { &self.artifact }
}

impl Default for IndexPaths {
    fn default() -> Self { Self::in_dir("cache") }
}

/// Writes postings, registry, term frequencies and lengths, in that order,
/// as consecutive bincode values in one file. Overwrites any existing artifact.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    let path = paths.artifact();
    let write_err = |source: bincode::Error| SearchError::ArtifactWrite { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| write_err(e.into()))?;
    }
    let f = File::create(path).map_err(|e| write_err(e.into()))?;
    let mut w = BufWriter::new(f);
    write_section(&mut w, &index.postings).map_err(write_err)?;
    write_section(&mut w, &index.docs).map_err(write_err)?;
    write_section(&mut w, &index.term_frequencies).map_err(write_err)?;
    write_section(&mut w, &index.doc_lengths).map_err(write_err)?;
    w.flush().map_err(|e| write_err(e.into()))?;

    tracing::debug!(path = %path.display(), "index artifact written");
    Ok(())
}

/// Reads the four tables back in the order [`save_index`] wrote them.
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let path = paths.artifact();
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SearchError::ArtifactNotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(SearchError::ArtifactDecode { path: path.to_path_buf(), source: e.into() }),
    };
    let decode_err = |source: bincode::Error| SearchError::ArtifactDecode { path: path.to_path_buf(), source };

    let mut r = BufReader::new(f);
    let postings: HashMap<String, DocIdSet> = read_section(&mut r).map_err(decode_err)?;
    let docs: HashMap<DocId, Document> = read_section(&mut r).map_err(decode_err)?;
    let term_frequencies: HashMap<DocId, HashMap<String, u32>> = read_section(&mut r).map_err(decode_err)?;
    let doc_lengths: HashMap<DocId, u32> = read_section(&mut r).map_err(decode_err)?;

    tracing::debug!(path = %path.display(), num_docs = docs.len(), "index artifact loaded");
    Ok(InvertedIndex { postings, docs, term_frequencies, doc_lengths })
}

fn write_section<W: Write, T: Serialize>(w: &mut W, value: &T) -> bincode::Result<()> {
    bincode::serialize_into(w, value)
}

fn read_section<R: Read, T: DeserializeOwned>(r: &mut R) -> bincode::Result<T> {
    bincode::deserialize_from(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_index(&IndexPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, SearchError::ArtifactNotFound { .. }));
    }

    #[test]
    fn truncated_artifact_fails_to_decode() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let mut idx = InvertedIndex::new();
        idx.add_document(
            Document { id: 1, title: "bear".into(), description: String::new() },
            &["bear".to_string()],
        );
        save_index(&paths, &idx).unwrap();

        let bytes = std::fs::read(paths.artifact()).unwrap();
        std::fs::write(paths.artifact(), &bytes[..bytes.len() / 2]).unwrap();
        let err = load_index(&paths).unwrap_err();
        assert!(matches!(err, SearchError::ArtifactDecode { .. }));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("nested").join("cache").join("index.bin"));
        save_index(&paths, &InvertedIndex::new()).unwrap();
        assert!(paths.artifact().exists());
        assert_eq!(paths.artifact().file_name().unwrap(), "index.bin");
        assert_eq!(load_index(&paths).unwrap(), InvertedIndex::new());
    }

    #[test]
    fn default_location_is_cache_dir() {
        assert_eq!(IndexPaths::default().artifact(), Path::new("cache").join(ARTIFACT_FILE));
    }
}
