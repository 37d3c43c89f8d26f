/// `(document index, score)` within one corpus.
pub type ScoredResult = (usize, f64);

/// Sort by score descending. The sort is stable, so equal scores stay in the order
/// they were supplied; callers supply ascending document order.
pub fn sort_descending(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// First `limit` entries, then drop non-positive scores when asked to.
pub fn take_top(mut results: Vec<ScoredResult>, limit: usize, positive_only: bool) -> Vec<ScoredResult> {
    results.truncate(limit);
    if positive_only {
        results.retain(|(_, score)| *score > 0.0);
    }
    results
}
