//! Interpretation buckets for the final 0-100 score.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of each bucket, in score points.
pub const EXCELLENT_MIN: f64 = 80.0;
pub const GOOD_MIN: f64 = 65.0;
pub const FAIR_MIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs improvement")]
    NeedsImprovement,
}

impl Bucket {
    /// Classify a rounded final score. Thresholds are checked high to low.
    pub fn from_score(final_score: f64) -> Self {
        if final_score >= EXCELLENT_MIN {
            Bucket::Excellent
        } else if final_score >= GOOD_MIN {
            Bucket::Good
        } else if final_score >= FAIR_MIN {
            Bucket::Fair
        } else {
            Bucket::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Excellent => "Excellent",
            Bucket::Good => "Good",
            Bucket::Fair => "Fair",
            Bucket::NeedsImprovement => "Needs improvement",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
