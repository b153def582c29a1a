use serde::{Serialize, Deserialize};

/// Upper bound on the result list of a single search
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal when ranking
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Default shard count of the parallel scoring accumulator
pub const ACCUMULATOR_SHARDS: usize = 157;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_results: usize,
    pub relevance_epsilon: f64,
    pub accumulator_shards: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            accumulator_shards: ACCUMULATOR_SHARDS,
        }
    }
}
