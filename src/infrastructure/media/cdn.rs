use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use serde::Deserialize;

use crate::settings::AppConfig;

/// HTTP client for the media CDN (Cloudinary-style upload/destroy API).
#[derive(Clone)]
pub struct CdnClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

impl CdnClient {
    /// Returns `None` when no CDN is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(base_url) = config.cdn_base_url.clone() else {
            return Ok(None);
        };

        let api_key = config
            .cdn_api_key
            .clone()
            .ok_or_else(|| anyhow!("CDN_API_KEY is required when CDN_BASE_URL is set"))?;
        let api_secret = config
            .cdn_api_secret
            .clone()
            .ok_or_else(|| anyhow!("CDN_API_SECRET is required when CDN_BASE_URL is set"))?;

        Ok(Some(CdnClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
        }))
    }

    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<UploadedImage> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .context("Invalid MIME type for upload")?;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/image/upload", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .multipart(form)
            .send()
            .await
            .context("CDN upload request failed")?
            .error_for_status()
            .context("CDN upload rejected")?;

        let uploaded: UploadedImage = response
            .json()
            .await
            .context("Unexpected CDN upload response")?;

        Ok(uploaded)
    }

    pub async fn delete_image(&self, public_id: &str) -> Result<()> {
        self.http
            .post(format!("{}/image/destroy", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .form(&[("public_id", public_id)])
            .send()
            .await
            .context("CDN delete request failed")?
            .error_for_status()
            .context("CDN delete rejected")?;

        Ok(())
    }

    /// One delete attempt per public id; individual failures are logged
    /// and swallowed so the caller's primary operation still succeeds.
    pub async fn delete_images_best_effort(&self, public_ids: &[String]) {
        let deletes = public_ids.iter().map(|public_id| async move {
            if let Err(e) = self.delete_image(public_id).await {
                tracing::warn!("CDN delete failed for {}: {}", public_id, e);
            }
        });

        join_all(deletes).await;
    }
}
