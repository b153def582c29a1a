use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::contains_control_bytes;
use crate::core::config::SearchConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, DocumentStatus};
use crate::index::inverted::InvertedIndex;
use crate::index::store::{average_rating, DocumentInfo, DocumentStore};
use crate::query::parser;
use crate::scoring::filter::DocumentFilter;
use crate::scoring::ranker;
use crate::scoring::scorer;

/// Plus-words of a query found in one document, with the document status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

/// In-memory search server: documents in, ranked TF-IDF results out.
///
/// Mutators take `&mut self` and are serialized by the caller. Read
/// operations take `&self` and may run concurrently with each other;
/// every parallel method has a sequential twin returning identical
/// results up to floating-point summation order.
#[derive(Debug)]
pub struct SearchServer {
    config: SearchConfig,
    stop_words: StopWordSet,
    store: DocumentStore,
    index: InvertedIndex,
}

impl SearchServer {
    /// Builds a server from an iterable of stop-word tokens
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SearchServer::assemble(
            StopWordSet::new(stop_words)?,
            SearchConfig::default(),
        ))
    }

    /// Builds a server from a space-separated stop-word string
    pub fn from_text(stop_words_text: &str) -> Result<Self> {
        Ok(SearchServer::assemble(
            StopWordSet::from_text(stop_words_text)?,
            SearchConfig::default(),
        ))
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SearchServer::assemble(StopWordSet::new(stop_words)?, config))
    }

    fn assemble(stop_words: StopWordSet, config: SearchConfig) -> Self {
        SearchServer {
            config,
            stop_words,
            store: DocumentStore::new(),
            index: InvertedIndex::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Indexes one document. The server is unchanged on failure.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if contains_control_bytes(text) {
            return Err(Error::new(
                ErrorKind::InvalidText,
                format!("control byte in text of document {}", id),
            ));
        }
        if id.value() < 0 {
            return Err(Error::new(
                ErrorKind::InvalidId,
                format!("negative document id {}", id),
            ));
        }
        if self.store.contains(id) {
            return Err(Error::new(
                ErrorKind::DuplicateId,
                format!("document id {} is already indexed", id),
            ));
        }

        let words = self.stop_words.split_no_stop(text);
        self.index.add_document(id, &words);
        self.store.insert(
            id,
            DocumentInfo {
                status,
                rating: average_rating(ratings),
            },
        );
        Ok(())
    }

    /// Top documents for the query among those with `Actual` status
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, DocumentStatus::Actual)
    }

    /// Top documents for the query, filtered by a status or a predicate
    pub fn find_top_documents_with<F: DocumentFilter>(
        &self,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>> {
        let query = parser::parse(raw_query, &self.stop_words)?;
        let matched = scorer::find_all_documents(&self.index, &self.store, &query, &filter);
        Ok(ranker::rank(matched, &self.config))
    }

    pub fn find_top_documents_par(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_par(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_with_par<F>(
        &self,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>>
    where
        F: DocumentFilter + Sync,
    {
        let query = parser::parse(raw_query, &self.stop_words)?;
        let matched =
            scorer::find_all_documents_par(&self.index, &self.store, &query, &filter, &self.config);
        Ok(ranker::rank_par(matched, &self.config))
    }

    /// Sorted plus-words of the query present in the document, or an
    /// empty list if any minus-word hits it
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<MatchResult> {
        let info = self.matchable_info(id)?;
        let query = parser::parse(raw_query, &self.stop_words)?;

        for &word in &query.minus_words {
            if self.index.contains(word, id) {
                return Ok(MatchResult {
                    words: Vec::new(),
                    status: info.status,
                });
            }
        }

        let words = query
            .plus_words
            .iter()
            .filter(|&&word| self.index.contains(word, id))
            .map(|&word| word.to_string())
            .collect();
        Ok(MatchResult {
            words,
            status: info.status,
        })
    }

    /// Parallel twin of [`match_document`](Self::match_document). Membership
    /// is tested against the document's own frequency map over the
    /// duplicate-retaining parse, deduplicating afterwards.
    pub fn match_document_par(&self, raw_query: &str, id: DocId) -> Result<MatchResult> {
        let info = self.matchable_info(id)?;
        let query = parser::parse_raw(raw_query, &self.stop_words)?;
        let frequencies = self.index.word_frequencies(id);

        let minus_hit = query
            .minus_words
            .par_iter()
            .any(|&word| frequencies.contains_key(word));
        if minus_hit {
            return Ok(MatchResult {
                words: Vec::new(),
                status: info.status,
            });
        }

        let mut words: Vec<&str> = query
            .plus_words
            .par_iter()
            .copied()
            .filter(|&word| frequencies.contains_key(word))
            .collect();
        words.par_sort_unstable();
        words.dedup();
        Ok(MatchResult {
            words: words.into_iter().map(str::to_string).collect(),
            status: info.status,
        })
    }

    fn matchable_info(&self, id: DocId) -> Result<DocumentInfo> {
        if id.value() < 0 {
            return Err(Error::new(
                ErrorKind::InvalidId,
                format!("negative document id {}", id),
            ));
        }
        self.store.info(id).ok_or_else(|| {
            Error::new(
                ErrorKind::NonexistentId,
                format!("document id {} is not indexed", id),
            )
        })
    }

    /// Term frequencies of one document; empty map for an unknown id
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.index.word_frequencies(id)
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// Live document ids in ascending order
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.store.ids()
    }

    /// Id at the given position of the ordered id set
    pub fn document_id_at(&self, order: usize) -> Result<DocId> {
        self.store.id_at(order).ok_or_else(|| {
            Error::new(
                ErrorKind::OutOfRange,
                format!("order {} outside [0, {})", order, self.store.len()),
            )
        })
    }

    /// Unindexes the document; silently does nothing for an unknown id
    pub fn remove_document(&mut self, id: DocId) {
        self.index.remove_document(id);
        self.store.remove(id);
    }

    pub fn remove_document_par(&mut self, id: DocId) {
        self.index.remove_document_par(id);
        self.store.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::paginator::paginate;

    fn add(
        server: &mut SearchServer,
        id: i32,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) {
        server
            .add_document(DocId(id), text, status, ratings)
            .unwrap();
    }

    /// Five pet documents behind stop words "and with"
    fn pet_corpus() -> SearchServer {
        let mut server = SearchServer::from_text("and with").unwrap();
        add(&mut server, 1, "funny pet and nasty rat", DocumentStatus::Actual, &[7, 2, 7]);
        add(&mut server, 2, "funny pet with curly hair", DocumentStatus::Actual, &[1, 2, 3]);
        add(&mut server, 3, "big cat nasty hair", DocumentStatus::Actual, &[1, 2, 8]);
        add(&mut server, 4, "big dog cat Vladislav", DocumentStatus::Actual, &[1, 3, 2]);
        add(&mut server, 5, "big dog hamster Borya", DocumentStatus::Actual, &[1, 1, 1]);
        server
    }

    fn ids(documents: &[Document]) -> Vec<i32> {
        documents.iter().map(|doc| doc.id.value()).collect()
    }

    #[test]
    fn test_find_top_documents_ranks_by_relevance() {
        let server = pet_corpus();
        let found = server.find_top_documents("curly dog").unwrap();

        // "curly" is rarer than "dog", document 2 leads; 4 and 5 tie on
        // relevance and fall back to rating
        assert_eq!(ids(&found), vec![2, 4, 5]);
        assert!(found[0].relevance > found[1].relevance);
        assert!((found[1].relevance - found[2].relevance).abs() < 1e-12);
    }

    #[test]
    fn test_pagination_of_results() {
        let server = pet_corpus();
        let found = server.find_top_documents("curly dog").unwrap();
        let pages = paginate(&found, 2);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.pages()[0].len(), 2);
        assert_eq!(pages.pages()[1].len(), 1);
    }

    #[test]
    fn test_relevance_ties_break_by_rating() {
        let mut server = SearchServer::from_text("").unwrap();
        let text = "spider man and doctor stiven strange with hulk";
        add(&mut server, 3, text, DocumentStatus::Actual, &[]);
        add(&mut server, 15, text, DocumentStatus::Actual, &[100]);
        add(&mut server, 400, text, DocumentStatus::Actual, &[500]);

        let found = server.find_top_documents("spider scooby pretty").unwrap();
        assert_eq!(ids(&found), vec![400, 15, 3]);
    }

    #[test]
    fn test_stop_words_are_not_searchable() {
        let mut server = SearchServer::from_text("with and").unwrap();
        add(
            &mut server,
            35,
            "spider man and doctor stiven strange with hulk",
            DocumentStatus::Actual,
            &[4, 5, 6, 5],
        );
        assert!(server.find_top_documents("and with").unwrap().is_empty());
        assert_eq!(
            ids(&server.find_top_documents("stiven").unwrap()),
            vec![35]
        );
    }

    #[test]
    fn test_minus_words_exclude_documents() {
        let mut server = SearchServer::from_text("").unwrap();
        add(
            &mut server,
            35,
            "spider man and doctor stiven strange with hulk",
            DocumentStatus::Actual,
            &[4, 5, 6, 5],
        );
        add(
            &mut server,
            45,
            "spider man and doctor stiven strange with neo",
            DocumentStatus::Actual,
            &[4, 5, 1],
        );
        let found = server.find_top_documents("spider man -hulk").unwrap();
        assert_eq!(ids(&found), vec![45]);
    }

    #[test]
    fn test_expected_relevance_values() {
        let mut server = SearchServer::from_text("").unwrap();
        add(&mut server, 3, "spider man and doctor stiven strange with hulk", DocumentStatus::Actual, &[4, 5, 6, 5]);
        add(&mut server, 2, "scooby dooby man our pretty fan you should finger flip pa-pa-pam", DocumentStatus::Actual, &[1, 2, 4]);
        add(&mut server, 1, "pretty woman with hulk", DocumentStatus::Actual, &[4, 4, 4]);

        let found = server.find_top_documents("spider man and hulk").unwrap();
        assert_eq!(ids(&found), vec![3, 1, 2]);

        let rounded: Vec<f64> = found
            .iter()
            .map(|doc| (doc.relevance * 10000.0).round() / 10000.0)
            .collect();
        assert_eq!(rounded, vec![0.3760, 0.1014, 0.0369]);
    }

    #[test]
    fn test_average_rating_is_truncated_mean() {
        let mut server = SearchServer::from_text("").unwrap();
        add(&mut server, 1, "spider man", DocumentStatus::Actual, &[4, 5, 6, 5]);
        add(&mut server, 2, "black cat", DocumentStatus::Actual, &[]);

        let found = server.find_top_documents("spider man cat").unwrap();
        let rating_of = |id: i32| {
            found
                .iter()
                .find(|doc| doc.id == DocId(id))
                .map(|doc| doc.rating)
                .unwrap()
        };
        assert_eq!(rating_of(1), 5);
        assert_eq!(rating_of(2), 0);
    }

    #[test]
    fn test_predicate_filter() {
        let server = pet_corpus();
        let found = server
            .find_top_documents_with(
                "big pet",
                |id: DocId, _status: DocumentStatus, _rating: i32| id.value() % 2 == 0,
            )
            .unwrap();
        assert!(found.iter().all(|doc| doc.id.value() % 2 == 0));
        assert!(!found.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let mut server = SearchServer::from_text("").unwrap();
        add(&mut server, 1, "pretty woman", DocumentStatus::Irrelevant, &[1]);
        add(&mut server, 2, "pretty man", DocumentStatus::Banned, &[2]);
        add(&mut server, 3, "pretty cat", DocumentStatus::Actual, &[3]);

        let found = server
            .find_top_documents_with("pretty", DocumentStatus::Irrelevant)
            .unwrap();
        assert_eq!(ids(&found), vec![1]);
        // Default filter is Actual
        let found = server.find_top_documents("pretty").unwrap();
        assert_eq!(ids(&found), vec![3]);
    }

    #[test]
    fn test_match_document() {
        let mut server = SearchServer::from_text("").unwrap();
        add(
            &mut server,
            35,
            "spider man and doctor stiven strange with hulk",
            DocumentStatus::Actual,
            &[4, 5, 6, 5],
        );

        let matched = server.match_document("spider man -hulk", DocId(35)).unwrap();
        assert!(matched.words.is_empty());
        assert_eq!(matched.status, DocumentStatus::Actual);

        let matched = server.match_document("spider hulk", DocId(35)).unwrap();
        assert_eq!(matched.words, vec!["hulk", "spider"]);
        assert_eq!(matched.status, DocumentStatus::Actual);
    }

    #[test]
    fn test_match_document_par_agrees_with_sequential() {
        let server = pet_corpus();
        let queries = [
            "curly dog",
            "big cat -hair",
            "pet pet nasty nasty",
            "rat -Vladislav dog",
        ];
        for raw in queries {
            for id in 1..=5 {
                let sequential = server.match_document(raw, DocId(id)).unwrap();
                let parallel = server.match_document_par(raw, DocId(id)).unwrap();
                assert_eq!(sequential, parallel, "query {:?}, id {}", raw, id);
            }
        }
    }

    #[test]
    fn test_match_document_rejects_bad_ids() {
        let server = pet_corpus();
        let err = server.match_document_par("pet", DocId(-1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidId);
        let err = server.match_document_par("pet", DocId(77)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentId);
        let err = server.match_document("pet", DocId(77)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentId);
    }

    #[test]
    fn test_add_document_failures_leave_server_unchanged() {
        let mut server = pet_corpus();

        let err = server
            .add_document(DocId(-3), "ok text", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidId);

        let err = server
            .add_document(DocId(1), "recurring id", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateId);

        let err = server
            .add_document(DocId(9), "bad \x02 byte", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidText);

        assert_eq!(server.document_count(), 5);
        assert!(server.word_frequencies(DocId(9)).is_empty());
    }

    #[test]
    fn test_invalid_query_is_rejected() {
        let server = pet_corpus();
        for raw in ["curly -", "--dog", "cat --dog"] {
            let err = server.find_top_documents(raw).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidQuery, "query {:?}", raw);
        }
    }

    #[test]
    fn test_sequential_and_parallel_find_agree() {
        let server = pet_corpus();
        for raw in ["curly dog", "big -cat", "pet nasty rat", "hamster"] {
            let sequential = server.find_top_documents(raw).unwrap();
            let parallel = server.find_top_documents_par(raw).unwrap();
            assert_eq!(ids(&sequential), ids(&parallel), "query {:?}", raw);
            for (seq, par) in sequential.iter().zip(&parallel) {
                assert!((seq.relevance - par.relevance).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_word_frequencies() {
        let server = pet_corpus();
        let frequencies = server.word_frequencies(DocId(1));
        // "and" is a stop word, four words remain with tf 1/4
        assert_eq!(frequencies.len(), 4);
        assert_eq!(frequencies.get("funny"), Some(&0.25));
        assert!(server.word_frequencies(DocId(33)).is_empty());
    }

    #[test]
    fn test_document_ids_and_positional_access() {
        let server = pet_corpus();
        assert_eq!(
            server.document_ids().map(|id| id.value()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(server.document_id_at(0).unwrap(), DocId(1));
        assert_eq!(server.document_id_at(4).unwrap(), DocId(5));
        let err = server.document_id_at(5).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn test_remove_document_is_idempotent() {
        let mut server = pet_corpus();
        server.remove_document(DocId(2));
        assert_eq!(server.document_count(), 4);
        assert!(server.word_frequencies(DocId(2)).is_empty());
        assert!(server.find_top_documents("curly").unwrap().is_empty());

        // Second removal and removal of an unknown id are no-ops
        server.remove_document(DocId(2));
        server.remove_document(DocId(99));
        assert_eq!(server.document_count(), 4);
    }

    #[test]
    fn test_removed_id_can_be_reused() {
        let mut server = pet_corpus();
        server.remove_document(DocId(2));
        add(&mut server, 2, "entirely new text", DocumentStatus::Actual, &[1]);
        assert_eq!(
            ids(&server.find_top_documents("entirely").unwrap()),
            vec![2]
        );
        assert!(server.find_top_documents("curly").unwrap().is_empty());
    }

    #[test]
    fn test_parallel_remove_matches_sequential() {
        let mut sequential = pet_corpus();
        let mut parallel = pet_corpus();
        for id in [2, 4] {
            sequential.remove_document(DocId(id));
            parallel.remove_document_par(DocId(id));
        }
        assert_eq!(sequential.document_count(), parallel.document_count());
        for id in 1..=5 {
            assert_eq!(
                sequential.word_frequencies(DocId(id)),
                parallel.word_frequencies(DocId(id))
            );
        }
    }

    #[test]
    fn test_constructor_rejects_control_bytes() {
        let err = SearchServer::new(["ok", "ba\x01d"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidText);
        let err = SearchServer::from_text("ok ba\x1Fd").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidText);
    }

    #[test]
    fn test_results_cap_at_max_result_document_count() {
        let mut server = SearchServer::from_text("").unwrap();
        for id in 0..10 {
            add(&mut server, id, "common word", DocumentStatus::Actual, &[id]);
        }
        let found = server.find_top_documents("common").unwrap();
        assert_eq!(found.len(), 5);
        // Highest ratings survive the cut
        assert_eq!(ids(&found), vec![9, 8, 7, 6, 5]);
    }
}
