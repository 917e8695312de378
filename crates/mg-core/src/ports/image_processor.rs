use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::builder::ProcessedImage;

#[async_trait]
pub trait ImageProcessorPort: Send + Sync {
    /// Derives the full-resolution upload and the preview thumbnail from a
    /// crop result.
    async fn process_crop(&self, cropped: &[u8]) -> Result<ProcessedImage>;

    /// Re-encodes a full image at a lower quality to shrink it.
    async fn recompress(&self, image: &[u8], quality: u8) -> Result<Bytes>;
}
