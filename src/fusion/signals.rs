//! The seven fusion signals and the adapters that normalize raw upstream
//! measurements into them.
//!
//! Every adapter is total: absent or malformed input maps to the signal's
//! fallback instead of failing, so fusion can always run.

use serde::{Deserialize, Serialize};

/// Side length (px) at which an image counts as full quality.
pub const FULL_QUALITY_MIN_SIDE_PX: f64 = 720.0;

/// Flat bonus levels for the hashtag-quantity signal.
pub const HASHTAG_BONUS_MANY: f64 = 0.10;
pub const HASHTAG_BONUS_FEW: f64 = 0.05;
/// Hashtag count at which the bonus saturates.
pub const HASHTAG_TARGET_COUNT: usize = 3;

/// Sentiment value used when the label is neutral, unknown or missing.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Normalized per-dimension values, all in [0,1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub clip_similarity: f64,
    pub sentiment: f64,
    pub hashtag_relevance: f64,
    pub hashtag_quantity: f64,
    pub readability: f64,
    pub face_presence: f64,
    pub dimension_quality: f64,
}

impl Signals {
    /// Signal set produced when every collaborator failed.
    pub fn fallback() -> Self {
        Self {
            sentiment: NEUTRAL_SENTIMENT,
            ..Self::default()
        }
    }

    /// Copy with every value passed through `clamp01`.
    pub fn clamped(&self) -> Self {
        Self {
            clip_similarity: clamp01(self.clip_similarity),
            sentiment: clamp01(self.sentiment),
            hashtag_relevance: clamp01(self.hashtag_relevance),
            hashtag_quantity: clamp01(self.hashtag_quantity),
            readability: clamp01(self.readability),
            face_presence: clamp01(self.face_presence),
            dimension_quality: clamp01(self.dimension_quality),
        }
    }

    /// Values in signal order (same order as `FusionWeights::as_array`).
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.clip_similarity,
            self.sentiment,
            self.hashtag_relevance,
            self.hashtag_quantity,
            self.readability,
            self.face_presence,
            self.dimension_quality,
        ]
    }
}

/// Clamp into [0,1]; NaN maps to 0.0, infinities to the nearest bound.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Round to 3 decimals, the precision collaborators report similarities in.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Map a cosine similarity in [-1,1] onto [0,1].
pub fn clip_similarity(cosine: Option<f64>) -> f64 {
    match cosine {
        Some(c) => round3(clamp01((c + 1.0) / 2.0)),
        None => 0.0,
    }
}

/// Sentiment label + model confidence to a positivity value.
///
/// Labels match by prefix, so `POS`, `positive` and `Positivo` are all
/// positive. Anything else is neutral.
pub fn sentiment(label: Option<&str>, score: f64) -> f64 {
    let label = label.unwrap_or_default().trim().to_lowercase();
    if label.starts_with("pos") {
        clamp01(score)
    } else if label.starts_with("neg") {
        clamp01(1.0 - clamp01(score))
    } else {
        NEUTRAL_SENTIMENT
    }
}

/// Mean of per-hashtag normalized similarities; 0.0 without hashtags.
pub fn hashtag_relevance(similarities: &[f64]) -> f64 {
    if similarities.is_empty() {
        return 0.0;
    }
    let sum: f64 = similarities.iter().copied().map(clamp01).sum();
    round3(sum / similarities.len() as f64)
}

/// Flat bonus for the number of hashtags; saturates at three.
pub fn hashtag_quantity(count: usize) -> f64 {
    if count >= HASHTAG_TARGET_COUNT {
        HASHTAG_BONUS_MANY
    } else if count >= 1 {
        HASHTAG_BONUS_FEW
    } else {
        0.0
    }
}

/// Reading ease already scaled to [0,1] upstream; missing means 0.0.
pub fn readability(ease: Option<f64>) -> f64 {
    ease.map(clamp01).unwrap_or(0.0)
}

pub fn face_presence(face_count: u32) -> f64 {
    if face_count > 0 {
        1.0
    } else {
        0.0
    }
}

/// Image resolution quality from the shorter side.
pub fn dimension_quality(width_px: u32, height_px: u32) -> f64 {
    let min_side = width_px.min(height_px) as f64;
    clamp01(min_side / FULL_QUALITY_MIN_SIDE_PX)
}
