//! # Fusion Engine
//! Pure, testable logic that maps `(signals, weights, params)` → `FusedResult`.
//! No I/O, no shared state; calling it twice with the same input yields the
//! same output.
//!
//! Steps: weighted sum → bucket → confidence interval → explanation → tips.

use serde::{Deserialize, Serialize};

use super::bucket::Bucket;
use super::confidence::{
    confidence_interval, to_percent, ConfidenceInterval, ConfidenceLevel, EFFECTIVE_SAMPLE_SIZE,
};
use super::explain;
use super::signals::{clamp01, Signals};
use super::weights::FusionWeights;

/// Image facts quoted by the small-image tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub width_px: u32,
    pub height_px: u32,
    /// Human-readable file size, e.g. `"48.5 KB"`.
    pub size_label: String,
}

impl Default for ImageSummary {
    fn default() -> Self {
        Self {
            width_px: 0,
            height_px: 0,
            size_label: "size unknown".to_string(),
        }
    }
}

/// Non-signal facts about the post that the tips refer to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFacts {
    pub hashtag_count: usize,
    /// Top audience label from the classifier, if any.
    pub audience: Option<String>,
    pub image: ImageSummary,
}

/// Everything `fuse` reads about one post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionInput {
    pub signals: Signals,
    pub facts: PostFacts,
}

/// Interval settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionParams {
    pub confidence: ConfidenceLevel,
    pub effective_sample_size: u32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            confidence: ConfidenceLevel::default(),
            effective_sample_size: EFFECTIVE_SAMPLE_SIZE,
        }
    }
}

/// Fused score with its interval and texts. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedResult {
    pub final_score: f64,
    pub bucket: Bucket,
    pub confidence_interval: ConfidenceInterval,
    pub explanation_text: String,
    pub tips_text: String,
}

/// Weighted sum of clamped signals, clamped to [0,1].
pub fn raw_score(signals: &Signals, weights: &FusionWeights) -> f64 {
    let sum: f64 = signals
        .clamped()
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(v, w)| v * clamp01(w))
        .sum();
    clamp01(sum)
}

/// Fuse seven signals into one scored, explained result.
///
/// Never fails: every numeric input is clamped before use. Callers map
/// missing signals to their fallbacks before calling.
pub fn fuse(input: &FusionInput, weights: &FusionWeights, params: &FusionParams) -> FusedResult {
    let signals = input.signals.clamped();

    // 1) Weighted sum
    let raw = raw_score(&signals, weights);
    let final_score = to_percent(raw);

    // 2) Bucket
    let bucket = Bucket::from_score(final_score);

    // 3) Interval around the unrounded score; rounding is monotone, so the
    //    rounded bounds still bracket the rounded score.
    let components: Vec<(f64, f64)> = signals
        .as_array()
        .into_iter()
        .zip(weights.as_array().map(clamp01))
        .collect();
    let confidence_interval = confidence_interval(
        raw,
        &components,
        params.confidence,
        params.effective_sample_size,
    );

    // 4) + 5) Texts
    let explanation_text = explain::explanation(final_score, weights);
    let tips_text = explain::tips(&signals, &input.facts).join(" ");

    FusedResult {
        final_score,
        bucket,
        confidence_interval,
        explanation_text,
        tips_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_input() -> FusionInput {
        FusionInput {
            signals: Signals {
                clip_similarity: 0.9,
                sentiment: 0.8,
                hashtag_relevance: 0.7,
                hashtag_quantity: 0.10,
                readability: 0.5,
                face_presence: 1.0,
                dimension_quality: 0.6,
            },
            facts: PostFacts {
                hashtag_count: 3,
                audience: Some("adult audience (30–50)".to_string()),
                image: ImageSummary {
                    width_px: 432,
                    height_px: 640,
                    size_label: "88.1 KB".to_string(),
                },
            },
        }
    }

    #[test]
    fn worked_example_scores_good() {
        let r = fuse(&example_input(), &FusionWeights::DEFAULT, &FusionParams::default());
        assert_eq!(r.final_score, 70.5);
        assert_eq!(r.bucket, Bucket::Good);
        assert!(r.confidence_interval.contains(r.final_score));
        assert!(r.confidence_interval.width() > 0.0);
        assert_eq!(
            r.tips_text,
            "Your strongest audience is: adult audience (30–50). \
             3 hashtags detected. Good coverage for discoverability."
        );
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let mut input = example_input();
        input.signals = Signals {
            clip_similarity: 7.0,
            sentiment: -3.0,
            hashtag_relevance: f64::NAN,
            hashtag_quantity: 0.1,
            readability: f64::INFINITY,
            face_presence: 1.0,
            dimension_quality: 2.0,
        };
        let r = fuse(&input, &FusionWeights::DEFAULT, &FusionParams::default());
        // 0.30 + 0 + 0 + 0.015 + 0.10 + 0.15 + 0.05
        assert_eq!(r.final_score, 61.5);
        assert_eq!(r.bucket, Bucket::Fair);
    }

    #[test]
    fn all_max_is_excellent_with_degenerate_interval() {
        let input = FusionInput {
            signals: Signals {
                clip_similarity: 1.0,
                sentiment: 1.0,
                hashtag_relevance: 1.0,
                hashtag_quantity: 1.0,
                readability: 1.0,
                face_presence: 1.0,
                dimension_quality: 1.0,
            },
            ..FusionInput::default()
        };
        let r = fuse(&input, &FusionWeights::DEFAULT, &FusionParams::default());
        assert_eq!(r.final_score, 100.0);
        assert_eq!(r.bucket, Bucket::Excellent);
        assert_eq!(r.confidence_interval, ConfidenceInterval { low: 100.0, high: 100.0 });
    }

    #[test]
    fn score_just_below_a_half_rounds_down() {
        // raw = 0.6244999999999999, i.e. 62.449999… percent
        let input = FusionInput {
            signals: Signals {
                clip_similarity: 0.787,
                sentiment: 0.854,
                hashtag_relevance: 0.289,
                hashtag_quantity: 0.0,
                readability: 0.314,
                face_presence: 1.0,
                dimension_quality: 1.0,
            },
            ..FusionInput::default()
        };
        let r = fuse(&input, &FusionWeights::DEFAULT, &FusionParams::default());
        assert_eq!(r.final_score, 62.4);
        assert_eq!(r.bucket, Bucket::Fair);
        assert!(r.confidence_interval.contains(62.4));
    }

    #[test]
    fn alternate_weight_scheme_changes_score_only_through_weights() {
        let clip_only = FusionWeights {
            clip_similarity: 1.0,
            sentiment: 0.0,
            hashtag_relevance: 0.0,
            hashtag_quantity: 0.0,
            readability: 0.0,
            face_presence: 0.0,
            dimension_quality: 0.0,
        };
        let r = fuse(&example_input(), &clip_only, &FusionParams::default());
        assert_eq!(r.final_score, 90.0);
        assert!(r.explanation_text.contains("100% from image–caption alignment"));
        assert!(r.explanation_text.contains("0% from sentiment positivity"));
    }
}
