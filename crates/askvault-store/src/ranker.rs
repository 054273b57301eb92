//! Deterministic cosine scoring and exact top-k ranking.

use std::cmp::Ordering;

/// Compute cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Score every candidate against `query` and return the top `k` as
/// `(candidate_index, score)` pairs, highest score first.
///
/// A zero-norm query yields no results at all; candidates are not scored.
/// A zero-norm candidate scores exactly 0.0 and still participates in
/// ranking. Ties keep candidate order (stable sort), so identical inputs
/// always produce identical output.
pub fn rank_top_k(query: &[f32], candidates: &[&[f32]], k: usize) -> Vec<(usize, f32)> {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let query_norm: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
    if query_norm == 0.0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| (i, cosine_similarity(query, candidate)))
        .collect();

    // Stable: equal scores keep insertion order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}
