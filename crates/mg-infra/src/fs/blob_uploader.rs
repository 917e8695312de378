use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use mg_core::ports::{BlobUploadPort, UploadedBlob};

const FILE_URL_PREFIX: &str = "file://";

/// Blob "upload" into a local directory. Used when no blob service URL is
/// configured; returned URLs are `file://` paths.
pub struct FsBlobUploader {
    root: PathBuf,
}

impl FsBlobUploader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_from_url(&self, url: &str) -> Result<PathBuf> {
        let path = url
            .strip_prefix(FILE_URL_PREFIX)
            .map(PathBuf::from)
            .with_context(|| format!("not a file url: {url}"))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("url has no file name: {url}"))?;
        validate_file_name(file_name)?;
        if path.parent() != Some(self.root.as_path()) {
            anyhow::bail!("url {url} is outside the blob directory");
        }
        Ok(path)
    }
}

fn validate_file_name(file_name: &str) -> Result<()> {
    let is_plain = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && Path::new(file_name).components().count() == 1
        && !file_name.contains(|c: char| c == '/' || c == '\\');
    if !is_plain {
        anyhow::bail!("invalid blob file name: {file_name}");
    }
    Ok(())
}

#[async_trait]
impl BlobUploadPort for FsBlobUploader {
    async fn upload(&self, data: &[u8], filename: &str, mime_type: &str) -> Result<UploadedBlob> {
        validate_file_name(filename)?;
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create blob dir {}", self.root.display()))?;

        let path = self.root.join(filename);
        fs::write(&path, data)
            .await
            .with_context(|| format!("write blob {}", path.display()))?;
        debug!(path = %path.display(), mime_type, bytes = data.len(), "Blob written");

        Ok(UploadedBlob {
            url: format!("{FILE_URL_PREFIX}{}", path.display()),
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let path = self.path_from_url(url)?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("remove blob {}", path.display()))?;
        Ok(())
    }
}
