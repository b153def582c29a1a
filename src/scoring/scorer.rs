use rayon::prelude::*;
use std::collections::BTreeMap;
use crate::core::config::SearchConfig;
use crate::core::types::{DocId, Document};
use crate::index::inverted::InvertedIndex;
use crate::index::store::DocumentStore;
use crate::parallel::concurrent_map::ConcurrentMap;
use crate::query::parser::Query;
use crate::scoring::filter::DocumentFilter;

fn inverse_document_frequency(doc_count: usize, doc_frequency: usize) -> f64 {
    (doc_count as f64 / doc_frequency as f64).ln()
}

/// TF-IDF relevance of every candidate document, unsorted.
///
/// The filter runs before a document accrues any contribution, so
/// rejected documents never enter the accumulator. The minus-word purge
/// is unconditional on the filter.
pub fn find_all_documents<F: DocumentFilter>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    filter: &F,
) -> Vec<Document> {
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();

    for &word in &query.plus_words {
        let Some(postings) = index.postings(word) else {
            continue;
        };
        let idf = inverse_document_frequency(store.len(), postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(info) = store.info(id) else {
                continue;
            };
            if filter.accept(id, info.status, info.rating) {
                *relevance.entry(id).or_insert(0.0) += idf * tf;
            }
        }
    }

    for &word in &query.minus_words {
        let Some(postings) = index.postings(word) else {
            continue;
        };
        for &id in postings.keys() {
            relevance.remove(&id);
        }
    }

    into_documents(relevance, store)
}

/// Parallel twin of [`find_all_documents`]: contributions accumulate in a
/// sharded [`ConcurrentMap`], plus-words and then minus-words are each
/// processed across the thread pool with the per-word inner loops serial.
pub fn find_all_documents_par<F>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    filter: &F,
    config: &SearchConfig,
) -> Vec<Document>
where
    F: DocumentFilter + Sync,
{
    let doc_count = store.len();
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(config.accumulator_shards);

    query.plus_words.par_iter().for_each(|&word| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        let idf = inverse_document_frequency(doc_count, postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(info) = store.info(id) else {
                continue;
            };
            if filter.accept(id, info.status, info.rating) {
                *relevance.access(id) += idf * tf;
            }
        }
    });

    query.minus_words.par_iter().for_each(|&word| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        for &id in postings.keys() {
            relevance.erase(id);
        }
    });

    into_documents(relevance.build_ordinary_map(), store)
}

fn into_documents(relevance: BTreeMap<DocId, f64>, store: &DocumentStore) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            store
                .info(id)
                .map(|info| Document::new(id, relevance, info.rating))
        })
        .collect()
}
