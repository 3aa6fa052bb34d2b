// src/collaborators/mod.rs
//! Upstream capability providers that turn a post into raw measurements.
//!
//! Each capability is a trait so the pipeline can mix local implementations
//! (lexicon sentiment, HTTP image probe) with a remote model server, or with
//! stubs in tests. Every call may fail; the pipeline substitutes the
//! signal's fallback and keeps going.

pub mod image_probe;
pub mod model_server;
pub mod readability;
pub mod sentiment;
pub mod stub;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CollaboratorConfig;
use crate::error::SignalError;

pub use image_probe::HttpImageProbe;
pub use model_server::ModelServerClient;
pub use readability::{reading_ease, ReadabilityReading, ReadingLevel};
pub use sentiment::LexiconSentiment;
pub use stub::{MockModels, Unavailable};

/// Image–text similarity for the caption and each hashtag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Raw cosine in [-1,1] between the caption and the image.
    pub caption_cosine: Option<f64>,
    /// Per-hashtag similarity already normalized to [0,1].
    pub hashtag_similarities: Vec<f64>,
}

/// Sentiment label and the model's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub label: String,
    pub score: f64,
}

/// Decoded image facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFacts {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageFacts {
    /// Size as kilobytes with up to two decimals and at least one, e.g.
    /// `"48.54 KB"`, `"2.0 KB"`.
    pub fn size_label(&self) -> String {
        let kb = (self.size_bytes as f64 / 1024.0 * 100.0).round() / 100.0;
        format!("{kb:?} KB")
    }
}

/// CLIP-style caption/hashtag ↔ image similarity.
#[async_trait]
pub trait AlignmentModel: Send + Sync {
    async fn align(
        &self,
        image_url: &str,
        caption: Option<&str>,
        hashtags: &[String],
    ) -> Result<Alignment, SignalError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn sentiment(&self, caption: &str) -> Result<SentimentReading, SignalError>;
    fn name(&self) -> &'static str;
}

/// Zero-shot audience classification; returns the top label.
#[async_trait]
pub trait AudienceModel: Send + Sync {
    async fn top_audience(&self, caption: &str) -> Result<String, SignalError>;
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn count_faces(&self, image_url: &str) -> Result<u32, SignalError>;
    fn name(&self) -> &'static str;
}

/// Fetches the image and reads its dimensions and size.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, image_url: &str) -> Result<ImageFacts, SignalError>;
    fn name(&self) -> &'static str;
}

/// One provider per capability, shared across requests.
#[derive(Clone)]
pub struct Collaborators {
    pub alignment: Arc<dyn AlignmentModel>,
    pub sentiment: Arc<dyn SentimentModel>,
    pub audience: Arc<dyn AudienceModel>,
    pub faces: Arc<dyn FaceDetector>,
    pub image: Arc<dyn ImageProbe>,
}

impl Collaborators {
    /// Every capability served by the same deterministic mock.
    pub fn mock() -> Self {
        let m = Arc::new(MockModels::default());
        Self {
            alignment: m.clone(),
            sentiment: m.clone(),
            audience: m.clone(),
            faces: m.clone(),
            image: m,
        }
    }

    /// Every capability fails; fusion runs on fallbacks only.
    pub fn unavailable() -> Self {
        let u = Arc::new(Unavailable);
        Self {
            alignment: u.clone(),
            sentiment: u.clone(),
            audience: u.clone(),
            faces: u.clone(),
            image: u,
        }
    }
}

/// Factory: build providers according to config.
///
/// * `test_mode` → deterministic mock for every capability.
/// * Otherwise local sentiment + HTTP image probe, and the model server for
///   alignment/audience/faces when `model_server_url` is set. Without it
///   those three always fall back.
pub fn build_collaborators(cfg: &CollaboratorConfig) -> Result<Collaborators, SignalError> {
    if cfg.test_mode {
        info!("collaborators: mock mode");
        return Ok(Collaborators::mock());
    }

    let timeout = Duration::from_secs(cfg.timeout_secs);
    let image: Arc<dyn ImageProbe> = Arc::new(HttpImageProbe::new(timeout, cfg.max_image_bytes)?);
    let sentiment: Arc<dyn SentimentModel> = Arc::new(LexiconSentiment::new());

    let (alignment, audience, faces) = match cfg.model_server_url.as_deref() {
        Some(url) => {
            let client = Arc::new(ModelServerClient::new(url, timeout)?);
            info!(model_server = %client.base_url(), "collaborators: model server configured");
            (
                client.clone() as Arc<dyn AlignmentModel>,
                client.clone() as Arc<dyn AudienceModel>,
                client as Arc<dyn FaceDetector>,
            )
        }
        None => {
            info!("collaborators: no model server, alignment/audience/faces will fall back");
            let u = Arc::new(Unavailable);
            (
                u.clone() as Arc<dyn AlignmentModel>,
                u.clone() as Arc<dyn AudienceModel>,
                u as Arc<dyn FaceDetector>,
            )
        }
    };

    Ok(Collaborators {
        alignment,
        sentiment,
        audience,
        faces,
        image,
    })
}
