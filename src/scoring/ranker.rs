use rayon::prelude::*;
use std::cmp::Ordering;
use crate::core::config::SearchConfig;
use crate::core::types::Document;

/// Relevance-descending order; relevances within `epsilon` are treated as
/// equal and fall back to rating-descending
fn compare(lhs: &Document, rhs: &Document, epsilon: f64) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() > epsilon {
        rhs.relevance.total_cmp(&lhs.relevance)
    } else {
        rhs.rating.cmp(&lhs.rating)
    }
}

/// Sorts the scorer output and truncates to the configured result cap
pub fn rank(mut documents: Vec<Document>, config: &SearchConfig) -> Vec<Document> {
    documents.sort_by(|lhs, rhs| compare(lhs, rhs, config.relevance_epsilon));
    documents.truncate(config.max_results);
    documents
}

/// Parallel sort, identical comparator and truncation
pub fn rank_par(mut documents: Vec<Document>, config: &SearchConfig) -> Vec<Document> {
    documents.par_sort_by(|lhs, rhs| compare(lhs, rhs, config.relevance_epsilon));
    documents.truncate(config.max_results);
    documents
}
