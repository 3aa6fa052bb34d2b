//! HTTP client for a model server hosting the heavy models (CLIP, zero-shot
//! audience classifier, face detector).
//!
//! Endpoints (JSON over POST, relative to the base URL):
//! - `/clip`     `{image_url, caption, hashtags}` → `{caption_cosine, hashtag_cosines}`
//! - `/audience` `{text}` → `{labels, scores}`
//! - `/faces`    `{image_url}` → `{face_count}`

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Alignment, AlignmentModel, AudienceModel, FaceDetector};
use crate::error::SignalError;
use crate::fusion::signals;

const NAME: &str = "model-server";

pub struct ModelServerClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ClipReq<'a> {
    image_url: &'a str,
    caption: Option<&'a str>,
    hashtags: &'a [String],
}

#[derive(Deserialize)]
struct ClipResp {
    #[serde(default)]
    caption_cosine: Option<f64>,
    #[serde(default)]
    hashtag_cosines: Vec<f64>,
}

#[derive(Serialize)]
struct AudienceReq<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AudienceResp {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[derive(Serialize)]
struct FacesReq<'a> {
    image_url: &'a str,
}

#[derive(Deserialize)]
struct FacesResp {
    face_count: u32,
}

impl ModelServerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SignalError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("post-quality-scorer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize + Sync, Resp: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, SignalError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Resp>().await?)
    }
}

/// Label with the highest score; labels and scores are parallel lists.
fn top_label(resp: AudienceResp) -> Result<String, SignalError> {
    if resp.labels.len() != resp.scores.len() {
        return Err(SignalError::InvalidResponse {
            collaborator: NAME,
            message: format!(
                "{} labels but {} scores",
                resp.labels.len(),
                resp.scores.len()
            ),
        });
    }
    resp.labels
        .into_iter()
        .zip(resp.scores)
        .filter(|(_, s)| s.is_finite())
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
        .ok_or_else(|| SignalError::InvalidResponse {
            collaborator: NAME,
            message: "no audience labels".to_string(),
        })
}

#[async_trait]
impl AlignmentModel for ModelServerClient {
    async fn align(
        &self,
        image_url: &str,
        caption: Option<&str>,
        hashtags: &[String],
    ) -> Result<Alignment, SignalError> {
        let resp: ClipResp = self
            .post(
                "/clip",
                &ClipReq {
                    image_url,
                    caption,
                    hashtags,
                },
            )
            .await?;
        Ok(Alignment {
            caption_cosine: resp.caption_cosine,
            hashtag_similarities: resp
                .hashtag_cosines
                .into_iter()
                .map(|c| signals::clip_similarity(Some(c)))
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl AudienceModel for ModelServerClient {
    async fn top_audience(&self, caption: &str) -> Result<String, SignalError> {
        let resp: AudienceResp = self.post("/audience", &AudienceReq { text: caption }).await?;
        top_label(resp)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl FaceDetector for ModelServerClient {
    async fn count_faces(&self, image_url: &str) -> Result<u32, SignalError> {
        let resp: FacesResp = self.post("/faces", &FacesReq { image_url }).await?;
        Ok(resp.face_count)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
