use crate::domain::model::BookRecord;
use std::collections::HashSet;

/// Drops every record whose title was already seen. First occurrence wins and
/// the surviving records keep their input order.
pub fn dedup_by_title(records: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|book| seen.insert(book.title.clone()))
        .collect()
}
