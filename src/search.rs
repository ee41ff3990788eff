use crate::table::Record;

/// Case-insensitive substring match of `query` against the record's name.
pub fn matches(record: &Record, query: &str) -> bool {
    name_contains(record, &query.to_lowercase())
}

/// Rows whose name contains `query`, in collection order.
pub fn filter<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    if query.is_empty() {
        return records.iter().collect();
    }
    let q = query.to_lowercase();
    records.iter().filter(|r| name_contains(r, &q)).collect()
}

// `lowered` must already be lowercase.
fn name_contains(record: &Record, lowered: &str) -> bool {
    record.name.to_lowercase().contains(lowered)
}
