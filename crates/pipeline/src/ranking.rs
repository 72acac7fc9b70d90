//! Stable descending ranking of scored rows.

use data_loader::RowIndex;
use serde::Serialize;
use std::cmp::Ordering;

/// A dataset row with the score the classifier gave it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedRow {
    pub row: RowIndex,
    pub score: f32,
}

/// Pair `rows` with `scores` and order by descending score.
///
/// Equal scores keep ascending row order, so the same input always ranks the
/// same way. NaN scores sort last. Extra entries in the longer slice are
/// ignored; callers check lengths first.
pub fn rank_by_score(rows: &[RowIndex], scores: &[f32]) -> Vec<RankedRow> {
    let mut ranked: Vec<RankedRow> = rows
        .iter()
        .zip(scores)
        .map(|(&row, &score)| RankedRow { row, score })
        .collect();

    ranked.sort_by(|a, b| compare_desc(a.score, b.score).then(a.row.cmp(&b.row)));
    ranked
}

fn compare_desc(a: f32, b: f32) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(ranked: &[RankedRow]) -> Vec<RowIndex> {
        ranked.iter().map(|r| r.row).collect()
    }

    #[test]
    fn test_descending_order() {
        let ranked = rank_by_score(&[10, 11, 12], &[0.2, 0.9, 0.5]);
        assert_eq!(rows_of(&ranked), vec![11, 12, 10]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_row_order() {
        let ranked = rank_by_score(&[3, 5, 8, 9], &[0.5, 0.7, 0.5, 0.5]);
        assert_eq!(rows_of(&ranked), vec![5, 3, 8, 9]);
    }

    #[test]
    fn test_ties_ordered_by_row_even_if_input_is_not() {
        let ranked = rank_by_score(&[9, 2, 4], &[0.1, 0.1, 0.1]);
        assert_eq!(rows_of(&ranked), vec![2, 4, 9]);
    }

    #[test]
    fn test_nan_sorts_last() {
        let ranked = rank_by_score(&[0, 1, 2], &[f32::NAN, 0.0, 0.3]);
        assert_eq!(rows_of(&ranked), vec![2, 1, 0]);
    }

    #[test]
    fn test_repeatable() {
        let rows: Vec<RowIndex> = (0..50).collect();
        let scores: Vec<f32> = rows.iter().map(|&r| (r % 7) as f32 / 7.0).collect();
        assert_eq!(rank_by_score(&rows, &scores), rank_by_score(&rows, &scores));
    }

    #[test]
    fn test_empty() {
        assert!(rank_by_score(&[], &[]).is_empty());
    }
}
