use serde::{Serialize, Deserialize};
use std::fmt;

/// Document identifier
///
/// Ids are caller-chosen integers. Negative ids are rejected at the API
/// boundary, so every indexed id is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub i32);

impl DocId {
    pub fn new(id: i32) -> Self {
        DocId(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for DocId {
    fn from(id: i32) -> Self {
        DocId(id)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation status carried by every document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// One search result entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Document {
            id,
            relevance,
            rating,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}
