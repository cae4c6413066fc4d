use crate::types::{ItemWindowSummary, QueryIntent};

/// Orders candidates by the intent's key, drops what the intent rejects and
/// keeps at most `limit` rows.
///
/// Candidates normally arrive already ordered and bounded by the source; the
/// sort is repeated here so the output only depends on the input rows.
/// A price ranking with more outliers than its over-fetch headroom returns
/// fewer than `limit` rows.
pub fn rank(
    mut rows: Vec<ItemWindowSummary>,
    intent: QueryIntent,
    limit: usize,
) -> Vec<ItemWindowSummary> {
    let key = intent.sort_key();
    rows.sort_by(|a, b| key.compare(a, b));
    rows.retain(|row| intent.admits(row));
    rows.truncate(limit);
    rows
}
