//! Upload gateway: size and type gate in front of an external blob store.
//!
//! Images arrive as in-memory buffers from the multipart layer. Nothing is
//! forwarded upstream until the buffer passes the limits, and only a URL the
//! store hands back is ever written to a restaurant document.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::UploadConfig;

pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryStore;
pub use memory::MemoryBlobStore;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    #[error("File too large: {size} bytes (max {limit})")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Unsupported image type '{0}'")]
    UnsupportedMediaType(String),

    #[error("Empty file provided")]
    EmptyFile,

    #[error("Blob store unavailable: {0}")]
    UpstreamUnavailable(String),
}

/// Image buffer plus the content type declared by the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// `image/PNG; charset=x` -> `image/png`
    fn normalized_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

/// External binary object store returning a durable public URL
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, upload: &ImageUpload) -> Result<String, UploadError>;
}

#[derive(Clone)]
pub struct UploadGateway {
    store: Arc<dyn BlobStore>,
    max_bytes: usize,
    accepted_types: Arc<Vec<String>>,
}

impl UploadGateway {
    pub fn new(store: Arc<dyn BlobStore>, config: &UploadConfig) -> Self {
        Self {
            store,
            max_bytes: config.max_image_bytes,
            accepted_types: Arc::new(config.accepted_types.clone()),
        }
    }

    /// Reject oversized or non-image buffers before touching the store.
    pub fn check(&self, upload: &ImageUpload) -> Result<(), UploadError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::PayloadTooLarge {
                size: upload.bytes.len(),
                limit: self.max_bytes,
            });
        }

        let content_type = upload.normalized_type();
        if !self.accepted_types.iter().any(|t| *t == content_type) {
            return Err(UploadError::UnsupportedMediaType(content_type));
        }

        if upload.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        Ok(())
    }

    /// Validate, forward to the blob store and return the public URL
    pub async fn upload(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        self.check(upload)?;

        let url = self.store.put(upload).await?;

        // Anything that is not an absolute URL is treated as a broken upstream response
        url::Url::parse(&url).map_err(|e| {
            UploadError::UpstreamUnavailable(format!("blob store returned invalid url '{}': {}", url, e))
        })?;

        tracing::info!(size = upload.bytes.len(), url = %url, "Image uploaded");
        Ok(url)
    }
}
