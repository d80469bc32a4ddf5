//! Final ordering of synthesized results.

use crate::types::result::SynthesizedResult;

/// Stable sort by relevance (highest first), then keep `max_results`.
pub fn finalize(mut results: Vec<SynthesizedResult>, max_results: usize) -> Vec<SynthesizedResult> {
    results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    results.truncate(max_results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(id: i64, score: u8) -> SynthesizedResult {
        SynthesizedResult {
            document_id: id,
            summary_point: format!("Point {}", id),
            relevance_score: score,
        }
    }

    #[test]
    fn test_sorts_and_truncates() {
        let out = finalize(
            vec![result(1, 40), result(2, 90), result(3, 70), result(4, 10), result(5, 85), result(6, 60)],
            5,
        );
        let ids: Vec<i64> = out.iter().map(|r| r.document_id).collect();
        assert_eq!(ids, vec![2, 5, 3, 6, 1]);
    }

    #[test]
    fn test_equal_scores_keep_order() {
        let out = finalize(vec![result(9, 50), result(3, 50), result(4, 80)], 5);
        let ids: Vec<i64> = out.iter().map(|r| r.document_id).collect();
        assert_eq!(ids, vec![4, 9, 3]);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_bounded(
            scores in prop::collection::vec(0u8..=100, 0..20),
            max in 0usize..8,
        ) {
            let input: Vec<_> = scores.iter().enumerate().map(|(i, s)| result(i as i64, *s)).collect();
            let out = finalize(input, max);

            prop_assert!(out.len() <= max);
            prop_assert!(out.len() == scores.len().min(max));
            prop_assert!(out.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));
        }
    }
}
