use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SearchError};

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid regex");
    /// English stopwords with apostrophes already stripped, so they match
    /// tokens as they come out of punctuation removal. Contractions that
    /// collide with ordinary words once stripped (he'll/hell, we'll/well,
    /// she'll/shell, won't/wont, ...) are left out.
    static ref DEFAULT_STOPWORDS: Vec<&'static str> = vec![
        "a","about","above","after","again","against","all","am","an","and","any","are","arent","as","at",
        "be","because","been","before","being","below","between","both","but","by",
        "can","cannot","could","couldnt",
        "did","didnt","do","does","doesnt","doing","dont","down","during",
        "each","few","for","from","further",
        "had","hadnt","has","hasnt","have","havent","having","he","hes","her","here","heres","hers","herself","him","himself","his","how","hows",
        "i","im","ive","if","in","into","is","isnt","it","its","itself",
        "me","more","most","mustnt","my","myself",
        "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
        "same","she","shes","should","shouldnt","so","some","such",
        "than","that","thats","the","their","theirs","them","themselves","then","there","theres","these","they","theyd","theyll","theyre","theyve","this","those","through","to","too",
        "under","until","up","very",
        "was","wasnt","we","were","weve","werent","what","whats","when","whens","where","wheres","which","while","who","whos","whom","why","whys","with","would","wouldnt",
        "you","youd","youll","youre","youve","your","yours","yourself","yourselves"
    ];
}

#[derive(Debug, Error)]
#[error("cannot stem {word:?}: {reason}")]
pub struct StemError {
    pub word: String,
    pub reason: String,
}

/// Reduces a lowercase word to its stem.
pub trait Stem: Send + Sync {
    fn stem<'a>(&self, word: &'a str) -> std::result::Result<Cow<'a, str>, StemError>;
}

/// Snowball English stemmer.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self { inner: Stemmer::create(Algorithm::English) }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Stem for SnowballStemmer {
    fn stem<'a>(&self, word: &'a str) -> std::result::Result<Cow<'a, str>, StemError> {
        Ok(self.inner.stem(word))
    }
}

/// Turns raw text into search tokens: NFKC, punctuation stripping and
/// lowercasing, whitespace split, stopword removal, stemming.
pub struct Normalizer {
    stopwords: HashSet<String>,
    stemmer: Box<dyn Stem>,
}

impl Normalizer {
    /// Stopwords are lowercased here; the set is matched against lowercased tokens.
    pub fn new<I, S>(stopwords: I, stemmer: Box<dyn Stem>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self { stopwords, stemmer }
    }

    /// Snowball English stemming with the given stopwords.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(stopwords, Box::new(SnowballStemmer::english()))
    }

    /// Snowball English stemming with the built-in English stopword list.
    pub fn english() -> Self {
        Self::with_stopwords(DEFAULT_STOPWORDS.iter())
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Ordered tokens, duplicates preserved.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>();
        let cleaned = PUNCT.replace_all(&folded, "").to_lowercase();
        let mut tokens = Vec::new();
        for word in cleaned.split_whitespace() {
            if self.is_stopword(word) {
                continue;
            }
            match self.stemmer.stem(word) {
                Ok(stem) => tokens.push(stem.into_owned()),
                Err(err) => {
                    tracing::warn!(word, error = %err, "stemming failed, keeping original token");
                    tokens.push(word.to_string());
                }
            }
        }
        tokens
    }

    /// Normalizes `query` and requires exactly one resulting token.
    pub fn single_token(&self, query: &str) -> Result<String> {
        let mut tokens = self.normalize(query);
        if tokens.len() != 1 {
            return Err(SearchError::InvalidQueryArity { query: query.to_string(), tokens: tokens.len() });
        }
        Ok(tokens.remove(0))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}
