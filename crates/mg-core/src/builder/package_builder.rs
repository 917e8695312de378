use tracing::{debug, info, warn};

use super::file::{IncomingFile, DEFAULT_MAX_FILE_BYTES};
use super::queue::{QueueStep, UploadQueue};
use super::staged::{ProcessedImage, StagedImage};
use crate::cart::{CartLineItem, Finish};
use crate::catalog::{find_package, Package};
use crate::errors::BuilderError;
use crate::ids::LineItemId;

/// Whether the customer has accepted losing work already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

/// Observable state of a package-build session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    PackageSelected { package_id: &'static str },
    CroppingImage { index: usize, total: usize },
    PackageIncomplete { staged: usize, max_files: usize },
    PackageComplete { max_files: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub queued: usize,
    /// Files dropped because the package had fewer free slots.
    pub truncated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropStep {
    NextFile { index: usize, total: usize, name: String },
    BatchComplete { staged: usize, package_complete: bool },
}

/// Assembles up to `max_files` cropped images for one package tier.
///
/// Every operation either succeeds or leaves the builder untouched.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    package: Option<&'static Package>,
    staged: Vec<StagedImage>,
    queue: UploadQueue,
    max_file_bytes: u64,
}

impl Default for PackageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::with_max_file_bytes(DEFAULT_MAX_FILE_BYTES)
    }

    pub fn with_max_file_bytes(max_file_bytes: u64) -> Self {
        Self {
            package: None,
            staged: Vec::new(),
            queue: UploadQueue::default(),
            max_file_bytes,
        }
    }

    pub fn active_package(&self) -> Option<&'static Package> {
        self.package
    }

    pub fn staged(&self) -> &[StagedImage] {
        &self.staged
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    /// File the customer is currently cropping.
    pub fn current_file(&self) -> Option<&IncomingFile> {
        self.queue.current()
    }

    pub fn remaining_slots(&self) -> usize {
        self.package
            .map(|p| p.max_files.saturating_sub(self.staged.len()))
            .unwrap_or(0)
    }

    pub fn state(&self) -> BuildState {
        let Some(package) = self.package else {
            return BuildState::Idle;
        };
        if self.queue.is_active() {
            return BuildState::CroppingImage {
                index: self.queue.cursor(),
                total: self.queue.len(),
            };
        }
        match self.staged.len() {
            0 => BuildState::PackageSelected {
                package_id: package.id,
            },
            n if n >= package.max_files => BuildState::PackageComplete {
                max_files: package.max_files,
            },
            n => BuildState::PackageIncomplete {
                staged: n,
                max_files: package.max_files,
            },
        }
    }

    /// Switches the active tier.
    ///
    /// With work in progress the switch discards it, so it needs
    /// [`Confirmation::Confirmed`]. Re-selecting the active tier is a no-op.
    pub fn select_package(
        &mut self,
        package_id: &str,
        confirmation: Confirmation,
    ) -> Result<&'static Package, BuilderError> {
        let package = find_package(package_id)
            .ok_or_else(|| BuilderError::UnknownPackage(package_id.to_string()))?;

        if self.package.map(|p| p.id) == Some(package.id) {
            return Ok(package);
        }

        let pending = self.staged.len() + self.queue.remaining();
        if pending > 0 {
            if confirmation == Confirmation::Unconfirmed {
                return Err(BuilderError::ConfirmationRequired { pending });
            }
            info!(pending, from = ?self.package.map(|p| p.id), to = package.id, "Discarding work to switch package");
            self.clear_staged();
        }

        self.package = Some(package);
        debug!(package_id = package.id, "Package selected");
        Ok(package)
    }

    /// Validates `files` and opens a crop session on the first one.
    ///
    /// More files than free slots is not an error: the list is truncated.
    pub fn enqueue_files(&mut self, mut files: Vec<IncomingFile>) -> Result<EnqueueOutcome, BuilderError> {
        let package = self.package.ok_or(BuilderError::NoPackageSelected)?;
        if files.is_empty() {
            return Err(BuilderError::EmptyBatch);
        }
        if self.queue.is_active() {
            return Err(BuilderError::CropSessionActive);
        }

        if let Some(file) = files.iter().find(|f| f.size_bytes > self.max_file_bytes) {
            return Err(BuilderError::FileTooLarge {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                limit_bytes: self.max_file_bytes,
            });
        }
        if let Some(file) = files.iter().find(|f| f.image_type().is_none()) {
            return Err(BuilderError::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }

        let remaining = self.remaining_slots();
        if remaining == 0 {
            return Err(BuilderError::PackageFull {
                max_files: package.max_files,
            });
        }

        let mut truncated = 0;
        if files.len() > remaining {
            truncated = files.len() - remaining;
            warn!(
                submitted = files.len(),
                remaining, truncated, "More files than free slots, truncating batch"
            );
            files.truncate(remaining);
        }

        let queued = files.len();
        self.queue = UploadQueue::start(files);
        debug!(queued, "Crop queue opened");
        Ok(EnqueueOutcome { queued, truncated })
    }

    /// Stages the crop result for the current file and moves to the next.
    pub fn submit_cropped_image(&mut self, processed: ProcessedImage) -> Result<CropStep, BuilderError> {
        let package = self.package.ok_or(BuilderError::NoPackageSelected)?;
        let current = self
            .queue
            .current()
            .ok_or(BuilderError::NoActiveCropSession)?;
        if self.staged.len() >= package.max_files {
            return Err(BuilderError::PackageFull {
                max_files: package.max_files,
            });
        }

        let staged = StagedImage::from_processed(processed, current.name.clone());
        self.staged.push(staged);

        let step = match self.queue.advance() {
            QueueStep::Next { index, total } => CropStep::NextFile {
                index,
                total,
                name: self
                    .queue
                    .current()
                    .map(|f| f.name.clone())
                    .unwrap_or_default(),
            },
            QueueStep::Drained => {
                let package_complete = self.staged.len() >= package.max_files;
                info!(staged = self.staged.len(), package_complete, "Crop batch complete");
                CropStep::BatchComplete {
                    staged: self.staged.len(),
                    package_complete,
                }
            }
        };
        Ok(step)
    }

    /// Abandons the open crop session, discarding every file not yet cropped.
    ///
    /// Returns the number of discarded files.
    pub fn cancel_crop_session(&mut self, confirmation: Confirmation) -> Result<usize, BuilderError> {
        let pending = self.queue.remaining();
        if pending > 1 && confirmation == Confirmation::Unconfirmed {
            return Err(BuilderError::ConfirmationRequired { pending });
        }
        self.queue.reset();
        if pending > 0 {
            debug!(discarded = pending, "Crop session cancelled");
        }
        Ok(pending)
    }

    pub fn clear_staged(&mut self) {
        self.staged.clear();
        self.queue.reset();
    }

    /// Builds the package line item from uploaded URLs, one per staged image
    /// in staged order.
    pub fn assemble_line_item(
        &self,
        image_urls: Vec<String>,
        finish: Finish,
    ) -> Result<CartLineItem, BuilderError> {
        let package = self.package.ok_or(BuilderError::NoPackageSelected)?;
        if self.staged.is_empty() {
            return Err(BuilderError::NothingStaged);
        }
        if image_urls.len() != self.staged.len() {
            return Err(BuilderError::UrlCountMismatch {
                expected: self.staged.len(),
                actual: image_urls.len(),
            });
        }

        let previews = self.staged.iter().map(StagedImage::thumbnail_data_uri).collect();
        Ok(CartLineItem::package(
            LineItemId::new(),
            package,
            finish,
            image_urls,
            previews,
        ))
    }

    /// Drops staged images once their URLs are owned by a cart item.
    pub fn complete_finalize(&mut self) {
        self.clear_staged();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use bytes::Bytes;

    const MB: u64 = 1024 * 1024;

    fn jpeg(name: &str) -> IncomingFile {
        IncomingFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF]).with_declared_size(MB)
    }

    fn processed(tag: &str) -> ProcessedImage {
        ProcessedImage {
            full_image: Bytes::from(format!("full-{tag}")),
            full_mime_type: "image/jpeg".to_string(),
            thumbnail: Bytes::from(format!("thumb-{tag}")),
            thumbnail_mime_type: "image/webp".to_string(),
        }
    }

    fn builder_with(package_id: &str) -> PackageBuilder {
        let mut builder = PackageBuilder::new();
        builder
            .select_package(package_id, Confirmation::Unconfirmed)
            .unwrap();
        builder
    }

    fn crop_all(builder: &mut PackageBuilder) -> CropStep {
        let mut last = None;
        while let Some(file) = builder.current_file() {
            let tag = file.name.clone();
            last = Some(builder.submit_cropped_image(processed(&tag)).unwrap());
        }
        last.expect("queue was empty")
    }

    #[test]
    fn test_enqueue_without_package_is_rejected() {
        let mut builder = PackageBuilder::new();
        let err = builder.enqueue_files(vec![jpeg("a.jpg")]).unwrap_err();
        assert_eq!(err, BuilderError::NoPackageSelected);
        assert_eq!(builder.state(), BuildState::Idle);
    }

    #[test]
    fn test_file_over_ten_megabytes_is_rejected_without_mutation() {
        let mut builder = builder_with("6");
        let big = IncomingFile::new("big.jpg", "image/jpeg", vec![0u8; 4]).with_declared_size(11 * MB);

        let err = builder.enqueue_files(vec![big]).unwrap_err();
        assert!(matches!(err, BuilderError::FileTooLarge { size_bytes, .. } if size_bytes == 11 * MB));
        assert_eq!(builder.staged().len(), 0);
        assert!(!builder.queue().is_active());
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let mut builder = builder_with("6");
        let gif = IncomingFile::new("anim.gif", "image/gif", vec![0u8; 4]);

        let err = builder.enqueue_files(vec![jpeg("a.jpg"), gif]).unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedType { ref name, .. } if name == "anim.gif"));
        assert!(!builder.queue().is_active());
    }

    #[test]
    fn test_size_is_checked_before_type() {
        let mut builder = builder_with("6");
        let gif = IncomingFile::new("anim.gif", "image/gif", vec![0u8; 4]);
        let big = jpeg("big.jpg").with_declared_size(20 * MB);

        let err = builder.enqueue_files(vec![gif, big]).unwrap_err();
        assert!(matches!(err, BuilderError::FileTooLarge { .. }));
    }

    #[test]
    fn test_extra_files_are_truncated_not_rejected() {
        let mut builder = builder_with("6");
        builder.enqueue_files(vec![jpeg("0.jpg"), jpeg("1.jpg")]).unwrap();
        crop_all(&mut builder);
        assert_eq!(builder.remaining_slots(), 4);

        let files: Vec<_> = (0..7).map(|i| jpeg(&format!("n{i}.jpg"))).collect();
        let outcome = builder.enqueue_files(files).unwrap();

        assert_eq!(outcome, EnqueueOutcome { queued: 4, truncated: 3 });
        assert_eq!(builder.queue().len(), 4);
    }

    #[test]
    fn test_full_package_rejects_more_files() {
        let mut builder = builder_with("1");
        builder.enqueue_files(vec![jpeg("only.jpg")]).unwrap();
        crop_all(&mut builder);

        let err = builder.enqueue_files(vec![jpeg("more.jpg")]).unwrap_err();
        assert_eq!(err, BuilderError::PackageFull { max_files: 1 });
        assert_eq!(builder.state(), BuildState::PackageComplete { max_files: 1 });
    }

    #[test]
    fn test_crop_queue_stages_images_in_input_order() {
        let mut builder = builder_with("9");
        let names: Vec<String> = (0..5).map(|i| format!("photo-{i}.jpg")).collect();
        builder
            .enqueue_files(names.iter().map(|n| jpeg(n)).collect())
            .unwrap();

        assert_eq!(builder.state(), BuildState::CroppingImage { index: 0, total: 5 });
        let step = builder.submit_cropped_image(processed("0")).unwrap();
        assert_eq!(
            step,
            CropStep::NextFile { index: 1, total: 5, name: "photo-1.jpg".to_string() }
        );

        let last = crop_all(&mut builder);
        assert_eq!(last, CropStep::BatchComplete { staged: 5, package_complete: false });
        assert!(builder.queue().is_empty());
        assert_eq!(builder.queue().cursor(), 0);

        let staged_names: Vec<&str> = builder.staged().iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(staged_names, names.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(builder.state(), BuildState::PackageIncomplete { staged: 5, max_files: 9 });
    }

    #[test]
    fn test_second_enqueue_during_crop_session_is_rejected() {
        let mut builder = builder_with("6");
        builder.enqueue_files(vec![jpeg("a.jpg"), jpeg("b.jpg")]).unwrap();
        let err = builder.enqueue_files(vec![jpeg("c.jpg")]).unwrap_err();
        assert_eq!(err, BuilderError::CropSessionActive);
        assert_eq!(builder.queue().len(), 2);
    }

    #[test]
    fn test_submit_without_session_is_rejected() {
        let mut builder = builder_with("6");
        let err = builder.submit_cropped_image(processed("x")).unwrap_err();
        assert_eq!(err, BuilderError::NoActiveCropSession);
    }

    #[test]
    fn test_cancel_with_several_files_left_requires_confirmation() {
        let mut builder = builder_with("6");
        builder
            .enqueue_files(vec![jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")])
            .unwrap();
        builder.submit_cropped_image(processed("a")).unwrap();

        let err = builder.cancel_crop_session(Confirmation::Unconfirmed).unwrap_err();
        assert_eq!(err, BuilderError::ConfirmationRequired { pending: 2 });
        assert_eq!(builder.queue().remaining(), 2);

        assert_eq!(builder.cancel_crop_session(Confirmation::Confirmed).unwrap(), 2);
        assert!(builder.queue().is_empty());
        assert_eq!(builder.queue().cursor(), 0);
        assert_eq!(builder.staged().len(), 1);
    }

    #[test]
    fn test_cancel_last_file_needs_no_confirmation() {
        let mut builder = builder_with("6");
        builder.enqueue_files(vec![jpeg("a.jpg")]).unwrap();
        assert_eq!(builder.cancel_crop_session(Confirmation::Unconfirmed).unwrap(), 1);
        assert_eq!(builder.state(), BuildState::PackageSelected { package_id: "6" });
    }

    #[test]
    fn test_switching_package_with_staged_images_requires_confirmation() {
        let mut builder = builder_with("6");
        builder.enqueue_files(vec![jpeg("a.jpg")]).unwrap();
        crop_all(&mut builder);

        let err = builder.select_package("9", Confirmation::Unconfirmed).unwrap_err();
        assert_eq!(err, BuilderError::ConfirmationRequired { pending: 1 });
        assert_eq!(builder.active_package().unwrap().id, "6");
        assert_eq!(builder.staged().len(), 1);

        builder.select_package("9", Confirmation::Confirmed).unwrap();
        assert_eq!(builder.active_package().unwrap().id, "9");
        assert!(builder.staged().is_empty());
    }

    #[test]
    fn test_reselecting_active_package_keeps_work() {
        let mut builder = builder_with("6");
        builder.enqueue_files(vec![jpeg("a.jpg")]).unwrap();
        crop_all(&mut builder);

        builder.select_package("6", Confirmation::Unconfirmed).unwrap();
        assert_eq!(builder.staged().len(), 1);
    }

    #[test]
    fn test_unknown_package_is_rejected() {
        let mut builder = PackageBuilder::new();
        let err = builder.select_package("7", Confirmation::Confirmed).unwrap_err();
        assert_eq!(err, BuilderError::UnknownPackage("7".to_string()));
        assert!(builder.active_package().is_none());
    }

    #[test]
    fn test_assemble_line_item_requires_one_url_per_image() {
        let mut builder = builder_with("6");
        builder.enqueue_files((0..6).map(|i| jpeg(&format!("{i}.jpg"))).collect()).unwrap();
        crop_all(&mut builder);

        let err = builder
            .assemble_line_item(vec!["u".to_string()], Finish::Gloss)
            .unwrap_err();
        assert_eq!(err, BuilderError::UrlCountMismatch { expected: 6, actual: 1 });

        let urls: Vec<String> = (0..6).map(|i| format!("https://cdn/{i}.jpg")).collect();
        let item = builder.assemble_line_item(urls.clone(), Finish::Gloss).unwrap();
        assert_eq!(item.images, urls);
        assert_eq!(item.previews.len(), 6);
        assert_eq!(item.price, Money::gbp(17, 0));
        assert_eq!(item.package_details().unwrap().package_id, "6");

        builder.complete_finalize();
        assert!(builder.staged().is_empty());
    }

    #[test]
    fn test_assemble_with_nothing_staged_is_rejected() {
        let builder = builder_with("6");
        let err = builder.assemble_line_item(vec![], Finish::Gloss).unwrap_err();
        assert_eq!(err, BuilderError::NothingStaged);
    }
}
