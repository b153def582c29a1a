use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use crate::core::types::DocId;

/// Postings of one term: every document containing it, with the term's
/// frequency in that document
pub type Postings = BTreeMap<DocId, f64>;

static EMPTY_FREQUENCIES: OnceLock<BTreeMap<String, f64>> = OnceLock::new();

/// Inverted index kept as two mirrored maps.
///
/// `postings` answers "which documents contain this term", `by_doc`
/// answers "which terms does this document contain". Both sides carry the
/// same tf values and are mutated together; a term key exists in
/// `postings` only while at least one document contains it. The postings
/// side is a concurrent map so the parallel remover may erase distinct
/// term keys from different threads.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: DashMap<String, Postings>,
    by_doc: BTreeMap<DocId, BTreeMap<String, f64>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Indexes the stop-word-free words of one document. Each occurrence
    /// contributes `1 / words.len()` to the word's tf. A document with no
    /// words still gets a `by_doc` entry.
    pub fn add_document(&mut self, id: DocId, words: &[&str]) {
        let mut frequencies: BTreeMap<String, f64> = BTreeMap::new();
        if !words.is_empty() {
            let weight = 1.0 / words.len() as f64;
            for &word in words {
                *frequencies.entry(word.to_string()).or_insert(0.0) += weight;
            }
        }

        for (word, tf) in &frequencies {
            self.postings.entry(word.clone()).or_default().insert(id, *tf);
        }
        self.by_doc.insert(id, frequencies);
    }

    pub fn postings(&self, word: &str) -> Option<Ref<'_, String, Postings>> {
        self.postings.get(word)
    }

    /// True if `word` is indexed for document `id`
    pub fn contains(&self, word: &str, id: DocId) -> bool {
        self.postings
            .get(word)
            .is_some_and(|postings| postings.contains_key(&id))
    }

    /// Term frequencies of one document, or a statically-lived empty map
    /// for an unknown id
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.by_doc
            .get(&id)
            .unwrap_or_else(|| EMPTY_FREQUENCIES.get_or_init(BTreeMap::new))
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn remove_document(&mut self, id: DocId) {
        let Some(frequencies) = self.by_doc.remove(&id) else {
            return;
        };
        for word in frequencies.keys() {
            self.erase_posting(word, id);
        }
    }

    /// Same as [`remove_document`](Self::remove_document) with the
    /// per-term erasures spread over the thread pool. Distinct terms
    /// resolve to distinct map entries, so the erasures are independent.
    pub fn remove_document_par(&mut self, id: DocId) {
        let Some(frequencies) = self.by_doc.remove(&id) else {
            return;
        };
        let words: Vec<&String> = frequencies.keys().collect();
        words
            .par_iter()
            .for_each(|&word| self.erase_posting(word, id));
    }

    fn erase_posting(&self, word: &str, id: DocId) {
        if let Some(mut postings) = self.postings.get_mut(word) {
            postings.remove(&id);
            let now_empty = postings.is_empty();
            drop(postings);
            if now_empty {
                self.postings.remove_if(word, |_, docs| docs.is_empty());
            }
        }
    }
}
