use rayon::prelude::*;
use crate::core::error::Result;
use crate::core::server::SearchServer;
use crate::core::types::Document;

/// Runs a top-documents search for every query across the thread pool,
/// preserving input order in the output
pub fn process_queries(
    server: &SearchServer,
    queries: &[String],
) -> Result<Vec<Vec<Document>>> {
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query))
        .collect()
}

/// In-order concatenation of the per-query result lists
pub fn process_queries_joined(
    server: &SearchServer,
    queries: &[String],
) -> Result<Vec<Document>> {
    Ok(process_queries(server, queries)?
        .into_iter()
        .flatten()
        .collect())
}
