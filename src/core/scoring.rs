// File: src/core/scoring.rs
use crate::core::types::{MAX_SCORE, MIN_SCORE};
use crate::error::TranslatorError;

/// Rejects ratings outside [1, 10]. NaN is rejected too.
pub fn validate_score(score: f64) -> Result<f64, TranslatorError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(TranslatorError::InvalidScore(score))
    }
}

/// Unweighted arithmetic mean of the whole history. No decay, no window.
/// An empty history has no mean.
pub fn mean(history: &[f64]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    Some(history.iter().sum::<f64>() / history.len() as f64)
}

/// Combines two histories for a merge: local first, then foreign.
/// Nothing is deduplicated, even scores that share an origin.
pub fn combine(local: &[f64], foreign: &[f64]) -> Vec<f64> {
    let mut combined = Vec::with_capacity(local.len() + foreign.len());
    combined.extend_from_slice(local);
    combined.extend_from_slice(foreign);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_plain_average() {
        assert_eq!(mean(&[5.0, 9.0]), Some(7.0));
        assert_eq!(mean(&[3.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn validate_accepts_bounds_only() {
        assert!(validate_score(1.0).is_ok());
        assert!(validate_score(10.0).is_ok());
        assert!(validate_score(0.0).is_err());
        assert!(validate_score(11.0).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn combine_keeps_duplicates_in_order() {
        assert_eq!(combine(&[5.0, 9.0], &[5.0]), vec![5.0, 9.0, 5.0]);
    }
}
