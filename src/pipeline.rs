// src/pipeline.rs
//! Post → collaborators → signals → fusion.
//!
//! Collaborators run concurrently. A failing collaborator never fails the
//! request: its signal takes the fallback value, the failure is logged and
//! counted, and fusion runs on whatever is left.

use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collaborators::{reading_ease, Alignment, Collaborators, ImageFacts, SentimentReading};
use crate::error::SignalError;
use crate::fusion::signals::{self, NEUTRAL_SENTIMENT};
use crate::fusion::{
    fuse, FusedResult, FusionInput, FusionParams, FusionWeights, ImageSummary, PostFacts, Signals,
};
use crate::metrics::{POST_ANALYSES_TOTAL, POST_FINAL_SCORE, SIGNAL_FALLBACKS_TOTAL};
use crate::request::{parse_post, ParsedPost};

/// Scored post plus the parsed text it was scored on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: FusedResult,
    /// Caption with hashtags removed; empty when the post had none.
    pub sequence: String,
    pub hashtags: Vec<String>,
}

/// Short, non-reversible id for log lines. Raw captions are never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Keep a collaborator's value, or log + count the fallback.
fn settle<T>(signal: &'static str, provider: &str, result: Result<T, SignalError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            match &e {
                SignalError::NoInput { .. } => debug!(signal, provider, "no input, using fallback"),
                _ => warn!(signal, provider, error = %e, "collaborator failed, using fallback"),
            }
            counter!(SIGNAL_FALLBACKS_TOTAL, "signal" => signal).increment(1);
            None
        }
    }
}

/// Raw collaborator readings for one post, after fallbacks were decided.
#[derive(Debug, Default)]
struct Readings {
    alignment: Option<Alignment>,
    sentiment: Option<SentimentReading>,
    audience: Option<String>,
    faces: Option<u32>,
    image: Option<ImageFacts>,
    ease: Option<f64>,
}

impl Readings {
    fn signals(&self, post: &ParsedPost) -> Signals {
        let (caption_cosine, hashtag_sims) = match &self.alignment {
            Some(a) => (a.caption_cosine, a.hashtag_similarities.as_slice()),
            None => (None, &[][..]),
        };
        Signals {
            clip_similarity: signals::clip_similarity(caption_cosine),
            sentiment: self
                .sentiment
                .as_ref()
                .map(|r| signals::sentiment(Some(&r.label), r.score))
                .unwrap_or(NEUTRAL_SENTIMENT),
            hashtag_relevance: signals::hashtag_relevance(hashtag_sims),
            hashtag_quantity: signals::hashtag_quantity(post.hashtag_count()),
            readability: signals::readability(self.ease),
            face_presence: self.faces.map(signals::face_presence).unwrap_or(0.0),
            dimension_quality: self
                .image
                .map(|f| signals::dimension_quality(f.width, f.height))
                .unwrap_or(0.0),
        }
    }

    fn facts(&self, post: &ParsedPost) -> PostFacts {
        PostFacts {
            hashtag_count: post.hashtag_count(),
            audience: self.audience.clone(),
            image: self
                .image
                .map(|f| ImageSummary {
                    width_px: f.width,
                    height_px: f.height,
                    size_label: f.size_label(),
                })
                .unwrap_or_default(),
        }
    }
}

/// Shared, immutable analyzer. One per process, cloned behind an `Arc`.
pub struct PostAnalyzer {
    collaborators: Collaborators,
    weights: FusionWeights,
    params: FusionParams,
}

impl PostAnalyzer {
    pub fn new(collaborators: Collaborators, weights: FusionWeights, params: FusionParams) -> Self {
        Self {
            collaborators,
            weights,
            params,
        }
    }

    /// Default interval settings used when a request does not override them.
    pub fn params(&self) -> FusionParams {
        self.params
    }

    pub fn weights(&self) -> &FusionWeights {
        &self.weights
    }

    /// Score a post with the analyzer's own interval settings.
    pub async fn analyze(&self, raw_text: &str, image_url: &str) -> AnalysisReport {
        self.analyze_with(raw_text, image_url, &self.params).await
    }

    /// Score a post with explicit interval settings.
    pub async fn analyze_with(
        &self,
        raw_text: &str,
        image_url: &str,
        params: &FusionParams,
    ) -> AnalysisReport {
        let post = parse_post(raw_text);
        let readings = self.gather(&post, image_url).await;

        let input = FusionInput {
            signals: readings.signals(&post),
            facts: readings.facts(&post),
        };
        debug!(signals = ?input.signals, "signals normalized");

        let result = fuse(&input, &self.weights, params);

        counter!(POST_ANALYSES_TOTAL).increment(1);
        histogram!(POST_FINAL_SCORE).record(result.final_score);
        info!(
            target: "scorer",
            id = %anon_hash(raw_text),
            score = result.final_score,
            bucket = %result.bucket,
            low = result.confidence_interval.low,
            high = result.confidence_interval.high,
            hashtags = post.hashtag_count(),
            "post analyzed"
        );

        AnalysisReport {
            result,
            sequence: post.caption.unwrap_or_default(),
            hashtags: post.hashtags,
        }
    }

    async fn gather(&self, post: &ParsedPost, image_url: &str) -> Readings {
        let c = &self.collaborators;
        let caption = post.caption.as_deref();

        let (alignment, sentiment, audience, faces, image) = tokio::join!(
            c.alignment.align(image_url, caption, &post.hashtags),
            async {
                match caption {
                    Some(text) => c.sentiment.sentiment(text).await,
                    None => Err(SignalError::NoInput {
                        collaborator: c.sentiment.name(),
                    }),
                }
            },
            async {
                match caption {
                    Some(text) => c.audience.top_audience(text).await,
                    None => Err(SignalError::NoInput {
                        collaborator: c.audience.name(),
                    }),
                }
            },
            c.faces.count_faces(image_url),
            c.image.probe(image_url),
        );

        let readability = caption.and_then(reading_ease);
        match &readability {
            Some(r) => debug!(ease = r.ease, level = r.level.label(), "caption readability"),
            None => {
                counter!(SIGNAL_FALLBACKS_TOTAL, "signal" => "readability").increment(1);
            }
        }

        Readings {
            alignment: settle("clip_similarity", c.alignment.name(), alignment),
            sentiment: settle("sentiment", c.sentiment.name(), sentiment),
            audience: settle("audience", c.audience.name(), audience),
            faces: settle("face_presence", c.faces.name(), faces),
            image: settle("dimension_quality", c.image.name(), image),
            ease: readability.map(|r| r.ease),
        }
    }
}
