use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use mg_core::ports::{BlobUploadPort, UploadedBlob};

use super::error::{ensure_success, HttpAdapterError};
use super::{build_client, join_url, DEFAULT_TIMEOUT};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Blob service over HTTP: `PUT {base}/{filename}` with the raw bytes,
/// answered by `{"url": "..."}`.
pub struct HttpBlobUploader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlobUploader {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpAdapterError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpAdapterError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl BlobUploadPort for HttpBlobUploader {
    async fn upload(&self, data: &[u8], filename: &str, mime_type: &str) -> Result<UploadedBlob> {
        let url = join_url(&self.base_url, filename);
        debug!(url = %url, bytes = data.len(), "Uploading blob");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(HttpAdapterError::from)?;
        let response = ensure_success(response).await?;
        let body: UploadResponse = response.json().await.map_err(HttpAdapterError::from)?;

        Ok(UploadedBlob { url: body.url })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(HttpAdapterError::from)?;
        ensure_success(response).await?;
        Ok(())
    }
}
