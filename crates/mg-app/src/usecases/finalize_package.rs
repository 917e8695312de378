use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

use mg_core::builder::{PackageBuilder, StagedImage};
use mg_core::cart::Finish;
use mg_core::ids::LineItemId;
use mg_core::ports::{BlobUploadPort, ImageProcessorPort};
use mg_core::{BuilderError, FinalizeError};

use crate::cart_session::CartSession;

/// Upload tuning taken from the store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Images larger than this are re-compressed before the first attempt.
    pub recompress_threshold_bytes: u64,
    pub recompress_quality: u8,
    /// Delete blobs uploaded earlier in a batch that later fails.
    pub cleanup_orphaned_uploads: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            recompress_threshold_bytes: 5 * 1024 * 1024,
            recompress_quality: 60,
            cleanup_orphaned_uploads: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedPackage {
    pub item_id: LineItemId,
    pub position: usize,
    pub image_urls: Vec<String>,
}

/// Uploads the staged images of a package and hands the resulting line
/// item to the cart.
///
/// Uploads run one at a time in staged order. The first image that cannot
/// be uploaded, even after re-compression, aborts the whole package: the
/// cart is untouched and the staged images stay staged.
pub struct FinalizePackageForCart {
    uploader: Arc<dyn BlobUploadPort>,
    processor: Arc<dyn ImageProcessorPort>,
    policy: UploadPolicy,
}

impl FinalizePackageForCart {
    pub fn new(
        uploader: Arc<dyn BlobUploadPort>,
        processor: Arc<dyn ImageProcessorPort>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            uploader,
            processor,
            policy,
        }
    }

    #[tracing::instrument(
        name = "usecase.finalize_package_for_cart.execute",
        skip(self, builder, cart),
        fields(staged = builder.staged().len())
    )]
    pub async fn execute(
        &self,
        builder: &mut PackageBuilder,
        cart: &mut CartSession,
        finish: Finish,
    ) -> Result<FinalizedPackage, FinalizeError> {
        let package = builder
            .active_package()
            .ok_or(BuilderError::NoPackageSelected)?;
        if builder.staged().is_empty() {
            return Err(BuilderError::NothingStaged.into());
        }
        if builder.queue().is_active() {
            return Err(BuilderError::CropSessionActive.into());
        }

        info!(package_id = package.id, "Uploading package images");
        let staged: Vec<StagedImage> = builder.staged().to_vec();
        let mut urls = Vec::with_capacity(staged.len());
        for (index, image) in staged.iter().enumerate() {
            match self.upload_one(index, image).await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    self.handle_orphans(&urls).await;
                    return Err(err);
                }
            }
        }

        let item = match builder.assemble_line_item(urls.clone(), finish) {
            Ok(item) => item,
            Err(err) => {
                self.handle_orphans(&urls).await;
                return Err(err.into());
            }
        };
        let item_id = item.id.clone();
        let position = cart.add_item(item).await;
        builder.complete_finalize();

        info!(item_id = %item_id, position, "Package added to cart");
        Ok(FinalizedPackage {
            item_id,
            position,
            image_urls: urls,
        })
    }

    async fn upload_one(&self, index: usize, image: &StagedImage) -> Result<String, FinalizeError> {
        let mut data = image.full_image.clone();
        let mut file_name = image.upload_file_name();
        let mut mime_type = image.full_mime_type.clone();
        let mut recompressed = false;

        if data.len() as u64 > self.policy.recompress_threshold_bytes {
            info!(index, bytes = data.len(), "Image above upload threshold, re-compressing");
            data = self.recompress(index, &data).await?;
            file_name = format!("{}.jpg", image.id);
            mime_type = "image/jpeg".to_string();
            recompressed = true;
        }

        match self.uploader.upload(&data, &file_name, &mime_type).await {
            Ok(blob) => Ok(blob.url),
            Err(e) if !recompressed => {
                warn!(index, error = %e, "Upload failed, retrying with aggressive compression");
                let smaller = self
                    .processor
                    .recompress(&data, self.policy.recompress_quality)
                    .await
                    .map_err(|pe| {
                        FinalizeError::upload_failed(
                            index,
                            pe.context("re-compression for upload retry failed"),
                        )
                    })?;
                self.uploader
                    .upload(&smaller, &format!("{}.jpg", image.id), "image/jpeg")
                    .await
                    .map(|blob| blob.url)
                    .map_err(|e| FinalizeError::upload_failed(index, e))
            }
            Err(e) => Err(FinalizeError::upload_failed(index, e)),
        }
    }

    async fn recompress(&self, index: usize, data: &[u8]) -> Result<Bytes, FinalizeError> {
        self.processor
            .recompress(data, self.policy.recompress_quality)
            .await
            .map_err(|e| FinalizeError::processing(index, e))
    }

    async fn handle_orphans(&self, uploaded: &[String]) {
        if uploaded.is_empty() {
            return;
        }
        if !self.policy.cleanup_orphaned_uploads {
            warn!(orphaned = uploaded.len(), "Package upload aborted, leaving uploaded blobs in place");
            return;
        }
        for url in uploaded {
            if let Err(e) = self.uploader.delete(url).await {
                warn!(url = %url, error = %e, "Failed to delete orphaned blob");
            }
        }
    }
}
