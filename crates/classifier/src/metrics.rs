//! Threshold-free ranking quality of a score vector.

/// Area under the ROC curve (Mann-Whitney formulation, ties share ranks).
///
/// Returns `None` when `labels` has no positives or no negatives, or when the
/// two slices differ in length.
pub fn roc_auc(scores: &[f32], labels: &[u8]) -> Option<f32> {
    if scores.len() != labels.len() {
        return None;
    }
    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average 1-based rank over each run of equal scores
    let mut ranks = vec![0.0_f64; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let avg_rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
        start = end;
    }

    let positive_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|&(&l, _)| l == 1)
        .map(|(_, &r)| r)
        .sum();
    let (p, n) = (positives as f64, negatives as f64);
    Some(((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n)) as f32)
}
