//! Score transforms.
//!
//! Raw MMD scores are square-root transformed and then min-max normalized
//! over the candidate list of a single bond.

use serde::Serialize;

/// Transformed and normalized score of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub raw: f64,
    pub normalized: f64,
}

pub fn sqrt_transform(scores: &[f64]) -> Vec<f64> {
    scores.iter().map(|s| s.sqrt()).collect()
}

/// Min-max normalization to `[0, 1]`; a constant list maps to all zeros.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|&v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

/// Score of the candidate at `idx` within `mmd_scores`.
pub fn score_at(mmd_scores: &[f64], idx: usize) -> Option<Score> {
    let transformed = sqrt_transform(mmd_scores);
    let normalized = min_max(&transformed);
    Some(Score {
        raw: *transformed.get(idx)?,
        normalized: *normalized.get(idx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_zero_and_one() {
        let normalized = min_max(&sqrt_transform(&[4.0, 1.0, 9.0, 2.25]));
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 1.0);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((normalized[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_scores_normalize_to_zero() {
        assert_eq!(min_max(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(min_max(&[3.0]), vec![0.0]);
    }

    #[test]
    fn score_at_reports_transformed_raw_value() {
        let score = score_at(&[1.0, 4.0], 1).unwrap();
        assert_eq!(score, Score { raw: 2.0, normalized: 1.0 });
        assert!(score_at(&[1.0], 3).is_none());
    }
}
