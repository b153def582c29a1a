use std::collections::VecDeque;
use crate::core::error::Result;
use crate::core::server::SearchServer;
use crate::core::types::{Document, DocumentStatus};
use crate::scoring::filter::DocumentFilter;

/// Window length of the request statistics, one slot per minute of a day
pub const MIN_IN_DAY: usize = 1440;

struct QueryRecord {
    was_empty: bool,
}

/// Sliding-window statistics over the most recent searches.
///
/// Wraps a server and counts how many of the last [`MIN_IN_DAY`] requests
/// returned no documents. Failed requests are not recorded.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryRecord>,
    empty_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        RequestQueue {
            server,
            requests: VecDeque::new(),
            empty_requests: 0,
        }
    }

    /// Searches with the default `Actual` status filter and records the
    /// outcome
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_with(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_with<F: DocumentFilter>(
        &mut self,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_with(raw_query, filter)?;
        self.record(result.is_empty());
        Ok(result)
    }

    /// Count of empty-result requests currently inside the window
    pub fn no_result_requests(&self) -> usize {
        self.empty_requests
    }

    fn record(&mut self, was_empty: bool) {
        self.requests.push_back(QueryRecord { was_empty });
        if was_empty {
            self.empty_requests += 1;
        }
        if self.requests.len() > MIN_IN_DAY {
            if let Some(dropped) = self.requests.pop_front() {
                if dropped.was_empty {
                    self.empty_requests -= 1;
                }
            }
        }
    }
}
