//! Fusion weights: one immutable value passed explicitly into every `fuse` call.
//!
//! TOML shape (all keys optional, missing keys keep the default):
//! ```toml
//! [weights]
//! clip_similarity = 0.30
//! sentiment = 0.15
//! hashtag_relevance = 0.10
//! hashtag_quantity = 0.15
//! readability = 0.10
//! face_presence = 0.15
//! dimension_quality = 0.05
//! ```
//!
//! The seven weights sum to exactly 1.0. `fuse` does not check this;
//! `validate()` does, and config loading calls it for alternate schemes.

use serde::{Deserialize, Serialize};

use crate::error::FusionError;

/// Allowed drift of the weight sum from 1.0.
const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub clip_similarity: f64,
    pub sentiment: f64,
    pub hashtag_relevance: f64,
    pub hashtag_quantity: f64,
    pub readability: f64,
    pub face_presence: f64,
    pub dimension_quality: f64,
}

impl FusionWeights {
    pub const DEFAULT: FusionWeights = FusionWeights {
        clip_similarity: 0.30,
        sentiment: 0.15,
        hashtag_relevance: 0.10,
        hashtag_quantity: 0.15,
        readability: 0.10,
        face_presence: 0.15,
        dimension_quality: 0.05,
    };

    /// Weights in signal order, paired with their config key.
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("clip_similarity", self.clip_similarity),
            ("sentiment", self.sentiment),
            ("hashtag_relevance", self.hashtag_relevance),
            ("hashtag_quantity", self.hashtag_quantity),
            ("readability", self.readability),
            ("face_presence", self.face_presence),
            ("dimension_quality", self.dimension_quality),
        ]
    }

    /// Weights in signal order (same order as `Signals::as_array`).
    pub fn as_array(&self) -> [f64; 7] {
        self.named().map(|(_, w)| w)
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Check every weight is in [0,1] and that they sum to 1.0.
    pub fn validate(&self) -> Result<(), FusionError> {
        for (name, value) in self.named() {
            if !(0.0..=1.0).contains(&value) {
                return Err(FusionError::WeightRange { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(FusionError::WeightSum { sum });
        }
        Ok(())
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integer percentage of a weight as shown in the explanation text.
///
/// Truncates like an integer cast, with a small epsilon so `0.29` shows as
/// 29 rather than 28 after binary rounding.
pub fn weight_percent(weight: f64) -> u32 {
    (weight * 100.0 + 1e-9).floor().max(0.0) as u32
}
