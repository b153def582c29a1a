use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::contains_control_bytes;
use crate::core::error::{Error, ErrorKind, Result};

/// Parsed query: plus-words score documents, minus-words exclude them.
///
/// Words borrow from the raw query string, so a `Query` lives no longer
/// than the text it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

/// Parses a raw query into sorted, deduplicated plus- and minus-words
pub fn parse<'q>(raw_query: &'q str, stop_words: &StopWordSet) -> Result<Query<'q>> {
    let mut query = parse_raw(raw_query, stop_words)?;
    query.plus_words.sort_unstable();
    query.plus_words.dedup();
    query.minus_words.sort_unstable();
    query.minus_words.dedup();
    Ok(query)
}

/// Duplicate-retaining variant consumed by the parallel matcher, which
/// deduplicates after its membership filter instead
pub fn parse_raw<'q>(raw_query: &'q str, stop_words: &StopWordSet) -> Result<Query<'q>> {
    if contains_control_bytes(raw_query) {
        return Err(Error::new(
            ErrorKind::InvalidText,
            "control byte in query",
        ));
    }

    let mut query = Query::default();
    for word in stop_words.split_no_stop(raw_query) {
        if let Some(minus_word) = word.strip_prefix('-') {
            if minus_word.is_empty() || minus_word.starts_with('-') {
                return Err(Error::new(
                    ErrorKind::InvalidQuery,
                    format!("lone or double minus in query word {:?}", word),
                ));
            }
            query.minus_words.push(minus_word);
        } else {
            query.plus_words.push(word);
        }
    }

    Ok(query)
}
