use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::{BlobStore, ImageUpload, UploadError};
use crate::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Signed uploads to Cloudinary's image upload endpoint, SHA-256 signatures.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UploadError::UpstreamUnavailable(format!("http client: {}", e)))?;
        let endpoint = format!("{}/{}/image/upload", API_BASE, config.cloud_name);

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Signature over the sorted signed params followed by the api secret
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        format!("{:x}", Sha256::digest(format!("{}{}", to_sign, self.config.api_secret)))
    }

    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![("timestamp", timestamp.to_string())];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.clone()));
        }
        params
    }
}

#[async_trait]
impl BlobStore for CloudinaryStore {
    async fn put(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let params = self.signed_params(chrono::Utc::now().timestamp());
        let signature = self.sign(&params);

        let file_name = upload.file_name.clone().unwrap_or_else(|| "image".to_string());
        let file = Part::bytes(upload.bytes.clone())
            .file_name(file_name)
            .mime_str(&upload.content_type)
            .map_err(|_| UploadError::UnsupportedMediaType(upload.content_type.clone()))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Cloudinary request failed");
                UploadError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Cloudinary rejected upload");
            return Err(UploadError::UpstreamUnavailable(format!("cloudinary returned {}", status)));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::UpstreamUnavailable(format!("invalid cloudinary response: {}", e)))?;

        body.secure_url
            .or(body.url)
            .ok_or_else(|| UploadError::UpstreamUnavailable("cloudinary response missing url".to_string()))
    }
}
