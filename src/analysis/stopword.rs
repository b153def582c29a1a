use std::collections::HashSet;
use crate::analysis::tokenizer::{contains_control_bytes, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};

/// Stop-word set, fixed at server construction.
///
/// Stop words are excluded from indexing and from query plus-words. A
/// minus-prefixed query token is never a stop word because the set only
/// stores bare forms.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in words {
            let word = word.as_ref();
            if contains_control_bytes(word) {
                return Err(Error::new(
                    ErrorKind::InvalidText,
                    format!("control byte in stop word {:?}", word),
                ));
            }
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(StopWordSet { words: set })
    }

    /// Builds the set from a space-separated string
    pub fn from_text(text: &str) -> Result<Self> {
        if contains_control_bytes(text) {
            return Err(Error::new(
                ErrorKind::InvalidText,
                "control byte in stop words text",
            ));
        }
        StopWordSet::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Tokenizes `text` and drops bare stop words
    pub fn split_no_stop<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_into_words(text)
            .into_iter()
            .filter(|word| !self.contains(word))
            .collect()
    }
}
