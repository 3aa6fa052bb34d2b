//! Human-readable text attached to a fused score: the weight explanation and
//! the ordered list of actionable tips.
//!
//! Tips are a declarative table evaluated top to bottom. Order is part of
//! the output contract; append new rules, do not reorder.

use super::bucket::{EXCELLENT_MIN, FAIR_MIN, GOOD_MIN};
use super::engine::PostFacts;
use super::signals::{Signals, HASHTAG_TARGET_COUNT};
use super::weights::{weight_percent, FusionWeights};

pub const SMALL_IMAGE_BELOW: f64 = 0.6;
pub const HARD_READING_BELOW: f64 = 0.4;
pub const WEAK_ALIGNMENT_BELOW: f64 = 0.6;

/// Audience shown when the classifier gave nothing.
pub const DEFAULT_AUDIENCE: &str = "general audience";

/// One conditional tip: emitted when `applies` holds.
pub struct TipRule {
    pub name: &'static str,
    applies: fn(&Signals, &PostFacts) -> bool,
    render: fn(&Signals, &PostFacts) -> String,
}

impl TipRule {
    pub fn evaluate(&self, signals: &Signals, facts: &PostFacts) -> Option<String> {
        (self.applies)(signals, facts).then(|| (self.render)(signals, facts))
    }
}

pub static TIP_RULES: &[TipRule] = &[
    TipRule {
        name: "audience",
        applies: |_, _| true,
        render: |_, f| {
            let audience = f
                .audience
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or(DEFAULT_AUDIENCE);
            format!("Your strongest audience is: {audience}.")
        },
    },
    TipRule {
        name: "face_absent",
        applies: |s, _| s.face_presence == 0.0,
        render: |_, _| "Consider featuring a face in the image to increase engagement.".to_string(),
    },
    TipRule {
        name: "small_image",
        applies: |s, _| s.dimension_quality < SMALL_IMAGE_BELOW,
        render: |_, f| {
            format!(
                "The image is relatively small ({}×{}, {}). A larger resolution may improve perceived quality.",
                f.image.width_px, f.image.height_px, f.image.size_label
            )
        },
    },
    TipRule {
        name: "hard_reading",
        applies: |s, _| s.readability < HARD_READING_BELOW,
        render: |_, _| {
            "The caption reads as difficult; simplifying the text may improve comprehension."
                .to_string()
        },
    },
    TipRule {
        name: "weak_alignment",
        applies: |s, _| s.clip_similarity < WEAK_ALIGNMENT_BELOW,
        render: |_, _| {
            "Image–caption alignment is moderate; refine the caption to better match the visual content."
                .to_string()
        },
    },
    TipRule {
        name: "no_hashtags",
        applies: |_, f| f.hashtag_count == 0,
        render: |_, _| {
            format!("No hashtags detected. Consider adding at least {HASHTAG_TARGET_COUNT} to maximize reach.")
        },
    },
    TipRule {
        name: "few_hashtags",
        applies: |_, f| (1..HASHTAG_TARGET_COUNT).contains(&f.hashtag_count),
        render: |_, f| {
            format!(
                "{} hashtag(s) detected. Consider using {HASHTAG_TARGET_COUNT} or more for better discoverability.",
                f.hashtag_count
            )
        },
    },
    TipRule {
        name: "enough_hashtags",
        applies: |_, f| f.hashtag_count >= HASHTAG_TARGET_COUNT,
        render: |_, f| {
            format!(
                "{} hashtags detected. Good coverage for discoverability.",
                f.hashtag_count
            )
        },
    },
];

/// Evaluate `TIP_RULES` in order and return the emitted tips.
pub fn tips(signals: &Signals, facts: &PostFacts) -> Vec<String> {
    TIP_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(signals, facts))
        .collect()
}

/// Fixed explanation of how the score was composed and how to read it.
pub fn explanation(final_score: f64, weights: &FusionWeights) -> String {
    format!(
        "The final score of {final_score:.1} reflects a weighted combination of key factors: \
         {}% from image–caption alignment (CLIP similarity), \
         {}% from sentiment positivity, \
         {}% from hashtag relevance, \
         {}% from hashtag quantity, \
         {}% from caption readability, \
         {}% from face presence, and \
         {}% from image size and quality. \
         The interpretation of the final score is as follows: \
         scores below {FAIR_MIN:.0} indicate a need for improvement, \
         scores between {FAIR_MIN:.0} and {GOOD_MIN:.0} are considered fair, \
         scores between {GOOD_MIN:.0} and {EXCELLENT_MIN:.0} represent good performance, \
         and scores of {EXCELLENT_MIN:.0} and above are classified as excellent.",
        weight_percent(weights.clip_similarity),
        weight_percent(weights.sentiment),
        weight_percent(weights.hashtag_relevance),
        weight_percent(weights.hashtag_quantity),
        weight_percent(weights.readability),
        weight_percent(weights.face_presence),
        weight_percent(weights.dimension_quality),
    )
}
