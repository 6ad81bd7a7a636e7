//! Sentiment payload returned by the external analyzer service.

use serde::{Deserialize, Serialize};

/// Result of analyzing a review comment.
///
/// `stars` is the raw 1..=5 rating predicted by the analyzer; `label` is the
/// coarse classification derived from it (`POSITIVE` / `NEUTRAL` /
/// `NEGATIVE`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
    pub stars: i64,
}

impl Sentiment {
    /// stars >= 4
    pub fn is_positive(&self) -> bool {
        self.stars >= 4
    }

    /// stars == 3
    pub fn is_neutral(&self) -> bool {
        self.stars == 3
    }

    /// stars <= 2
    pub fn is_negative(&self) -> bool {
        self.stars <= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment(stars: i64) -> Sentiment {
        Sentiment {
            label: String::new(),
            score: 0.9,
            stars,
        }
    }

    #[test]
    fn star_buckets_are_disjoint() {
        for stars in 1..=5 {
            let s = sentiment(stars);
            let buckets = [s.is_positive(), s.is_neutral(), s.is_negative()];
            assert_eq!(buckets.iter().filter(|b| **b).count(), 1, "stars={stars}");
        }
    }

    #[test]
    fn boundary_classification() {
        assert!(sentiment(4).is_positive());
        assert!(sentiment(3).is_neutral());
        assert!(sentiment(2).is_negative());
    }
}
