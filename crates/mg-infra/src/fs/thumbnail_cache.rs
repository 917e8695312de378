use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use mg_core::ports::ThumbnailCachePort;

const CACHE_FILE_EXT: &str = "bin";

/// Thumbnail cache in a local directory, one file per key.
///
/// The directory is treated as disposable: anything missing or unreadable
/// is reported as a miss.
pub struct FsThumbnailCache {
    root: PathBuf,
}

impl FsThumbnailCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let name = file_name_for_key(key)?;
        Ok(self.root.join(format!("{name}.{CACHE_FILE_EXT}")))
    }
}

/// Keys look like `{item_id}:{index}`; anything outside `[A-Za-z0-9_-]`
/// becomes `_` so the key cannot leave the cache directory.
fn file_name_for_key(key: &str) -> Result<String> {
    if key.is_empty() {
        anyhow::bail!("empty cache key");
    }
    Ok(key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect())
}

#[async_trait]
impl ThumbnailCachePort for FsThumbnailCache {
    async fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create thumbnail cache dir {}", self.root.display()))?;
        fs::write(&path, data)
            .await
            .with_context(|| format!("write thumbnail cache entry {}", path.display()))?;
        Ok(())
    }

    async fn try_restore(&self, key: &str) -> Option<Bytes> {
        let path = self.path_for(key).ok()?;
        match fs::read(&path).await {
            Ok(data) => Some(Bytes::from(data)),
            Err(e) => {
                debug!(key, error = %e, "Thumbnail cache miss");
                None
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove thumbnail cache entry {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_then_restore() {
        let dir = TempDir::new().unwrap();
        let cache = FsThumbnailCache::new(dir.path().join("thumbs"));

        cache.store("item-1:0", b"data:image/webp;base64,AAAA").await.unwrap();

        let restored = cache.try_restore("item-1:0").await.unwrap();
        assert_eq!(restored.as_ref(), b"data:image/webp;base64,AAAA");
    }

    #[tokio::test]
    async fn test_missing_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FsThumbnailCache::new(dir.path().to_path_buf());
        assert!(cache.try_restore("nope:3").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_deletes_entry_and_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let cache = FsThumbnailCache::new(dir.path().to_path_buf());
        cache.store("item-1:preview-0", b"data:x").await.unwrap();

        cache.remove("item-1:preview-0").await.unwrap();
        assert!(cache.try_restore("item-1:preview-0").await.is_none());
        cache.remove("item-1:preview-0").await.unwrap();
    }

    #[test]
    fn test_key_cannot_escape_root() {
        assert_eq!(file_name_for_key("../../etc/passwd").unwrap(), "______etc_passwd");
        assert!(file_name_for_key("").is_err());
    }
}
