//! External object storage.
//!
//! Blobs are written once under a freshly generated unique name and never
//! deleted by this service; a failed database write after a successful
//! upload leaves the blob orphaned.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::validation::UploadedFile;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Image upload failed: {0}")]
    Upload(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the file under a unique name and return its public URL.
    async fn upload(&self, file: &UploadedFile) -> Result<String, BlobError>;
}

/// HTTP-backed bucket client for a hosted object-storage API.
pub struct HttpObjectStore {
    http: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Uuid-prefixed so repeated uploads of the same filename never collide.
    fn unique_name(original: &str) -> String {
        let safe: String = original
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        format!("{}-{}", Uuid::new_v4().simple(), safe)
    }
}

impl Default for HttpObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, file: &UploadedFile) -> Result<String, BlobError> {
        let storage = &config::config().storage;
        let name = Self::unique_name(&file.name);
        let url = format!("{}/{}/{}", storage.endpoint, storage.bucket, name);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&storage.service_key)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| BlobError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlobError::Upload(format!(
                "storage returned {}",
                response.status()
            )));
        }

        Ok(format!("{}/{}/{}", storage.public_base, storage.bucket, name))
    }
}
