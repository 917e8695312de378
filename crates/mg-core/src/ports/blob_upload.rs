use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    pub url: String,
}

/// Remote storage for full-resolution package images.
#[async_trait]
pub trait BlobUploadPort: Send + Sync {
    /// Stores `data` under `filename` and returns its public URL.
    async fn upload(&self, data: &[u8], filename: &str, mime_type: &str) -> Result<UploadedBlob>;

    /// Removes a previously uploaded blob.
    async fn delete(&self, url: &str) -> Result<()>;
}

#[async_trait]
impl<T: BlobUploadPort + ?Sized> BlobUploadPort for Arc<T> {
    async fn upload(&self, data: &[u8], filename: &str, mime_type: &str) -> Result<UploadedBlob> {
        (**self).upload(data, filename, mime_type).await
    }

    async fn delete(&self, url: &str) -> Result<()> {
        (**self).delete(url).await
    }
}
