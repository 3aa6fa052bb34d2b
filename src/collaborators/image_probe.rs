//! Downloads the post image and reads its dimensions from the header.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{ImageFacts, ImageProbe};
use crate::error::SignalError;

pub struct HttpImageProbe {
    http: reqwest::Client,
    max_bytes: u64,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self, SignalError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("post-quality-scorer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, max_bytes })
    }

    fn check_size(&self, size_bytes: u64) -> Result<(), SignalError> {
        if size_bytes > self.max_bytes {
            return Err(SignalError::TooLarge {
                size_bytes,
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Width and height from encoded image bytes, format guessed from content.
pub fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), SignalError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SignalError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| SignalError::Decode(e.to_string()))
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, image_url: &str) -> Result<ImageFacts, SignalError> {
        let resp = self.http.get(image_url).send().await?.error_for_status()?;
        if let Some(len) = resp.content_length() {
            self.check_size(len)?;
        }
        let bytes = resp.bytes().await?;
        let size_bytes = bytes.len() as u64;
        self.check_size(size_bytes)?;

        let (width, height) = decode_dimensions(&bytes)?;
        debug!(width, height, size_bytes, "image probed");
        Ok(ImageFacts {
            width,
            height,
            size_bytes,
        })
    }

    fn name(&self) -> &'static str {
        "http-image-probe"
    }
}
