//! Stand-in providers: one that is never available, one that is fixed.

use async_trait::async_trait;

use super::{
    Alignment, AlignmentModel, AudienceModel, FaceDetector, ImageFacts, ImageProbe,
    SentimentModel, SentimentReading,
};
use crate::error::SignalError;

/// Used when no backend is configured; every call fails so the pipeline
/// applies the signal's fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

fn unavailable<T>() -> Result<T, SignalError> {
    Err(SignalError::Unavailable {
        collaborator: "unavailable",
    })
}

#[async_trait]
impl AlignmentModel for Unavailable {
    async fn align(&self, _: &str, _: Option<&str>, _: &[String]) -> Result<Alignment, SignalError> {
        unavailable()
    }
    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[async_trait]
impl SentimentModel for Unavailable {
    async fn sentiment(&self, _: &str) -> Result<SentimentReading, SignalError> {
        unavailable()
    }
    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[async_trait]
impl AudienceModel for Unavailable {
    async fn top_audience(&self, _: &str) -> Result<String, SignalError> {
        unavailable()
    }
    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[async_trait]
impl FaceDetector for Unavailable {
    async fn count_faces(&self, _: &str) -> Result<u32, SignalError> {
        unavailable()
    }
    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[async_trait]
impl ImageProbe for Unavailable {
    async fn probe(&self, _: &str) -> Result<ImageFacts, SignalError> {
        unavailable()
    }
    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// Deterministic readings for local runs and tests (`SIGNAL_TEST_MODE=mock`).
#[derive(Debug, Clone)]
pub struct MockModels {
    pub caption_cosine: f64,
    /// Normalized similarity reported for every hashtag.
    pub hashtag_similarity: f64,
    pub sentiment: SentimentReading,
    pub audience: String,
    pub faces: u32,
    pub image: ImageFacts,
}

impl Default for MockModels {
    fn default() -> Self {
        Self {
            caption_cosine: 0.8,
            hashtag_similarity: 0.7,
            sentiment: SentimentReading {
                label: "positive".to_string(),
                score: 0.8,
            },
            audience: "general audience".to_string(),
            faces: 1,
            image: ImageFacts {
                width: 1080,
                height: 1080,
                size_bytes: 245_760,
            },
        }
    }
}

#[async_trait]
impl AlignmentModel for MockModels {
    async fn align(
        &self,
        _: &str,
        caption: Option<&str>,
        hashtags: &[String],
    ) -> Result<Alignment, SignalError> {
        Ok(Alignment {
            caption_cosine: caption.map(|_| self.caption_cosine),
            hashtag_similarities: vec![self.hashtag_similarity; hashtags.len()],
        })
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl SentimentModel for MockModels {
    async fn sentiment(&self, _: &str) -> Result<SentimentReading, SignalError> {
        Ok(self.sentiment.clone())
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl AudienceModel for MockModels {
    async fn top_audience(&self, _: &str) -> Result<String, SignalError> {
        Ok(self.audience.clone())
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl FaceDetector for MockModels {
    async fn count_faces(&self, _: &str) -> Result<u32, SignalError> {
        Ok(self.faces)
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl ImageProbe for MockModels {
    async fn probe(&self, _: &str) -> Result<ImageFacts, SignalError> {
        Ok(self.image)
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}
