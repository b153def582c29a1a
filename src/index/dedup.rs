use std::collections::{BTreeMap, BTreeSet};
use crate::core::server::SearchServer;
use crate::core::types::DocId;

/// Removes documents whose word set duplicates another document's.
///
/// The smallest id of each group survives. Stop words never reach the
/// index, so documents differing only in stop words collapse into one
/// group. Every removal is reported on standard output.
pub fn remove_duplicates(server: &mut SearchServer) {
    for id in find_duplicates(server) {
        println!("Found duplicate document id {}", id);
        server.remove_document(id);
    }
}

/// Ids to drop, in ascending order: every group member except the
/// smallest
fn find_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut groups: BTreeMap<Vec<&str>, BTreeSet<DocId>> = BTreeMap::new();
    for id in server.document_ids() {
        let words: Vec<&str> = server
            .word_frequencies(id)
            .keys()
            .map(String::as_str)
            .collect();
        groups.entry(words).or_default().insert(id);
    }

    let mut to_remove: Vec<DocId> = groups
        .values()
        .flat_map(|ids| ids.iter().skip(1).copied())
        .collect();
    to_remove.sort_unstable();
    to_remove
}
