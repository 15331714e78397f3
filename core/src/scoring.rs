//! TF, IDF and BM25 scores for a single normalized token.
//!
//! All functions read the index and never modify it. `N` is the number of
//! documents in the registry and `df` the size of the token's postings set.

use crate::config::Bm25Params;
use crate::{DocId, InvertedIndex};

/// Raw occurrence count of `token` in `doc`.
pub fn tf(index: &InvertedIndex, doc: DocId, token: &str) -> u32 {
    index.term_frequency(doc, token)
}

/// `ln((N + 1) / (df + 1))`
pub fn idf(index: &InvertedIndex, token: &str) -> f64 {
    let n = index.num_docs() as f64;
    let df = index.doc_frequency(token) as f64;
    ((n + 1.0) / (df + 1.0)).ln()
}

pub fn tf_idf(index: &InvertedIndex, doc: DocId, token: &str) -> f64 {
    tf(index, doc, token) as f64 * idf(index, token)
}

/// `ln((N - df + 0.5) / (df + 0.5) + 1)`
pub fn bm25_idf(index: &InvertedIndex, token: &str) -> f64 {
    let n = index.num_docs() as f64;
    let df = index.doc_frequency(token) as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Saturated, length-normalized term frequency.
///
/// A document without a length entry is treated as length 1.
pub fn bm25_tf(index: &InvertedIndex, doc: DocId, token: &str, params: Bm25Params) -> f64 {
    let tf = tf(index, doc, token) as f64;
    let doc_len = match index.doc_length(doc) {
        Some(len) => len as f64,
        None => {
            tracing::warn!(doc_id = doc, "document has no length entry, using 1");
            1.0
        }
    };
    let norm = length_norm(doc_len, index.average_doc_length(), params.b);
    saturate(tf, params.k1, norm)
}

pub fn bm25(index: &InvertedIndex, doc: DocId, token: &str, params: Bm25Params) -> f64 {
    bm25_tf(index, doc, token, params) * bm25_idf(index, token)
}

/// `1 - b + b * (doc_len / avg_len)`, or 1 when the average is 0.
fn length_norm(doc_len: f64, avg_len: f64, b: f64) -> f64 {
    if avg_len == 0.0 {
        return 1.0;
    }
    1.0 - b + b * (doc_len / avg_len)
}

fn saturate(tf: f64, k1: f64, length_norm: f64) -> f64 {
    let denom = tf + k1 * length_norm;
    if denom == 0.0 {
        return 0.0;
    }
    (tf * (k1 + 1.0)) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::tokenizer::Normalizer;
    use crate::Document;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn scenario() -> InvertedIndex {
        let corpus = vec![
            Document { id: 1, title: "The Bear Grylls Show".into(), description: String::new() },
            Document { id: 2, title: "Stranger Things".into(), description: "a mystery show".into() },
        ];
        build(&corpus, &Normalizer::with_stopwords(["the", "a"]))
    }

    #[test]
    fn tf_is_zero_for_unknown_doc_or_term() {
        let idx = scenario();
        assert_eq!(tf(&idx, 1, "bear"), 1);
        assert_eq!(tf(&idx, 1, "mysteri"), 0);
        assert_eq!(tf(&idx, 99, "bear"), 0);
    }

    #[test]
    fn idf_of_term_in_every_doc_is_zero() {
        let idx = scenario();
        assert!(idf(&idx, "show").abs() < EPS);
        assert!(tf_idf(&idx, 1, "show").abs() < EPS);
        assert!(tf_idf(&idx, 2, "show").abs() < EPS);
    }

    #[test]
    fn idf_of_rare_term() {
        let idx = scenario();
        assert!((idf(&idx, "bear") - (3.0f64 / 2.0).ln()).abs() < EPS);
        assert!((idf(&idx, "wolf") - 3.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn bm25_idf_values() {
        let idx = scenario();
        // N = 2, df = 2: ln(0.5 / 2.5 + 1)
        assert!((bm25_idf(&idx, "show") - 1.2f64.ln()).abs() < EPS);
        // df = 1: ln(1.5 / 1.5 + 1)
        assert!((bm25_idf(&idx, "bear") - 2.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn bm25_tf_with_no_length_normalization() {
        let idx = scenario();
        let params = Bm25Params { k1: 1.5, b: 0.0 };
        // tf = 1: 2.5 / 2.5
        assert!((bm25_tf(&idx, 1, "bear", params) - 1.0).abs() < EPS);
        assert_eq!(bm25_tf(&idx, 1, "mysteri", params), 0.0);
    }

    #[test]
    fn bm25_tf_penalizes_longer_docs() {
        let idx = scenario();
        let params = Bm25Params::default();
        // doc 1 has 3 tokens, doc 2 has 4; both contain "show" once
        assert!(bm25_tf(&idx, 1, "show", params) > bm25_tf(&idx, 2, "show", params));
    }

    #[test]
    fn missing_length_falls_back_to_one() {
        let mut idx = scenario();
        idx.doc_lengths.remove(&1);
        let params = Bm25Params::default();
        // avg over remaining lengths is 4, doc_len 1: norm = 0.25 + 0.75 * 0.25
        let norm = 0.25 + 0.75 * 0.25;
        let expected = 2.5 / (1.0 + 1.5 * norm);
        assert!((bm25_tf(&idx, 1, "bear", params) - expected).abs() < EPS);
    }

    #[test]
    fn empty_index_is_neutral() {
        let idx = InvertedIndex::new();
        assert_eq!(idf(&idx, "bear"), 0.0);
        assert!(bm25_idf(&idx, "bear") >= 0.0);
        assert_eq!(bm25(&idx, 1, "bear", Bm25Params::default()), 0.0);
    }

    #[test]
    fn bm25_is_product_of_parts() {
        let idx = scenario();
        let p = Bm25Params::default();
        let expected = bm25_tf(&idx, 2, "stranger", p) * bm25_idf(&idx, "stranger");
        assert!((bm25(&idx, 2, "stranger", p) - expected).abs() < EPS);
    }

    fn tokens(parts: &[(&str, usize)]) -> Vec<String> {
        parts.iter().flat_map(|&(t, count)| std::iter::repeat(t.to_string()).take(count)).collect()
    }

    fn empty_doc(id: DocId) -> Document {
        Document { id, title: String::new(), description: String::new() }
    }

    /// `n` documents of two tokens each, the first `df` of them containing "t".
    fn index_with_df(n: usize, df: usize) -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        for i in 0..n {
            let t = if i < df { 1 } else { 0 };
            idx.add_document(empty_doc(i as DocId), &tokens(&[("t", t), ("x", 2 - t)]));
        }
        idx
    }

    /// Document 1 has `tf` copies of "t" padded to `len` tokens; document 2 has `other_len` tokens.
    fn index_with_tf(tf: usize, len: usize, other_len: usize) -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        idx.add_document(empty_doc(1), &tokens(&[("t", tf), ("x", len - tf)]));
        idx.add_document(empty_doc(2), &tokens(&[("y", other_len)]));
        idx
    }

    proptest! {
        #[test]
        fn prop_idf_non_negative(n in 0usize..300, df_frac in 0.0f64..=1.0) {
            let df = (n as f64 * df_frac).floor() as usize;
            let idx = index_with_df(n, df);
            prop_assert_eq!(idx.doc_frequency("t"), df);
            prop_assert!(idf(&idx, "t") >= 0.0);
            prop_assert!(bm25_idf(&idx, "t") >= 0.0);
        }

        #[test]
        fn prop_bm25_tf_monotonic_and_bounded(
            tf in 0usize..50,
            pad in 1usize..50,
            other_len in 1usize..100,
            k1 in 0.0f64..10.0,
            b in 0.0f64..=1.0,
        ) {
            let len = tf + pad;
            let params = Bm25Params { k1, b };
            let lo = bm25_tf(&index_with_tf(tf, len, other_len), 1, "t", params);
            let hi = bm25_tf(&index_with_tf(tf + 1, len, other_len), 1, "t", params);
            prop_assert!(hi + EPS >= lo);
            prop_assert!(hi <= k1 + 1.0 + EPS);
        }
    }
}
