use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{BlobStore, ImageUpload, UploadError};

/// Blob store kept in process memory, addressed by content hash.
///
/// Used by `--storage memory` runs and by tests. `set_offline` makes every
/// `put` fail as if the remote store were unreachable.
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
    offline: AtomicBool,
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn get(&self, url: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(url).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(UploadError::UpstreamUnavailable("memory blob store is offline".to_string()));
        }

        let hash = format!("{:x}", Sha256::digest(&upload.bytes));
        let extension = upload
            .content_type
            .split('/')
            .nth(1)
            .map(|subtype| subtype.split(';').next().unwrap_or(subtype).trim().to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());
        let url = format!("{}/{}.{}", self.base_url, hash, extension);

        self.blobs.write().await.insert(
            url.clone(),
            StoredBlob {
                content_type: upload.content_type.clone(),
                bytes: upload.bytes.clone(),
            },
        );

        Ok(url)
    }
}
