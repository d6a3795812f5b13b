//! Population-wide ranking and rank normalization.
//!
//! Ranks are 1-based with the average-rank tie convention: tied values all
//! receive the mean of the positions they occupy, so `[5, 5, 9]` ranks as
//! `[1.5, 1.5, 3]` ascending.

/// Direction in which values earn higher ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Smallest value gets rank 1, largest gets the highest rank.
    Ascending,
    /// Largest value gets rank 1, smallest gets the highest rank.
    Descending,
}

/// Compute average ranks for `values`, returned in input order.
pub fn average_rank(values: &[f64], order: RankOrder) -> Vec<f64> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = values[a].total_cmp(&values[b]);
        match order {
            RankOrder::Ascending => ord,
            RankOrder::Descending => ord.reverse(),
        }
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < indices.len() {
        let mut end = start + 1;
        while end < indices.len() && values[indices[end]] == values[indices[start]] {
            end += 1;
        }
        // Positions start+1 ..= end share their mean.
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &indices[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }

    ranks
}

/// Rescale ranks onto (0, 100] via `rank / max(rank) * 100`.
///
/// Callers must not pass an empty slice's result into scoring; an empty
/// input simply yields an empty output here.
pub fn normalize_ranks(ranks: &[f64]) -> Vec<f64> {
    let max = ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ranks.iter().map(|rank| rank / max * 100.0).collect()
}
