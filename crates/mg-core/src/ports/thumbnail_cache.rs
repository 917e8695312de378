use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Ephemeral local cache for preview payloads too large to persist inline.
///
/// Entries may vanish at any time; a miss is not an error.
#[async_trait]
pub trait ThumbnailCachePort: Send + Sync {
    async fn store(&self, key: &str, data: &[u8]) -> Result<()>;

    async fn try_restore(&self, key: &str) -> Option<Bytes>;

    /// Deletes an entry. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
