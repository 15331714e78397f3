use crate::tokenizer::Normalizer;
use crate::{Document, InvertedIndex};

/// Builds a fresh index from the whole corpus. Documents are indexed on
/// `title + " " + description`.
pub fn build<'a, I>(corpus: I, normalizer: &Normalizer) -> InvertedIndex
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut index = InvertedIndex::new();
    for doc in corpus {
        let text = format!("{} {}", doc.title, doc.description);
        let tokens = normalizer.normalize(&text);
        index.add_document(doc.clone(), &tokens);
    }
    tracing::info!(num_docs = index.num_docs(), num_terms = index.postings.len(), "ingested documents");
    index
}
