use crate::core::types::{DocId, DocumentStatus};

/// Predicate deciding whether a document may appear in search results.
///
/// Implemented for any `Fn(DocId, DocumentStatus, i32) -> bool` and for
/// `DocumentStatus` itself, which accepts exactly that status. Dispatch
/// is static; the predicate runs in the innermost scoring loop.
pub trait DocumentFilter {
    fn accept(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentFilter for F
where
    F: Fn(DocId, DocumentStatus, i32) -> bool,
{
    fn accept(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool {
        self(id, status, rating)
    }
}

impl DocumentFilter for DocumentStatus {
    fn accept(&self, _id: DocId, status: DocumentStatus, _rating: i32) -> bool {
        status == *self
    }
}
