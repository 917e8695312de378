//! Use cases driving the storefront.
//!
//! ```text
//! select_package / enqueue_files      (PackageBuilder, synchronous)
//!         ↓
//! SubmitCroppedImage                  per queued file
//!         ↓
//! FinalizePackageForCart              uploads → CartSession::add_item
//!         ↓
//! SubmitCheckout                      order API → CartSession::clear_cart
//! ```

pub mod checkout;
pub mod finalize_package;
pub mod submit_crop;

pub use checkout::{CheckoutDetails, SubmitCheckout};
pub use finalize_package::{FinalizePackageForCart, FinalizedPackage, UploadPolicy};
pub use submit_crop::SubmitCroppedImage;

use crate::deps::AppDeps;

/// Builds use cases from [`AppDeps`].
pub struct UseCases<'a> {
    deps: &'a AppDeps,
    policy: UploadPolicy,
}

impl<'a> UseCases<'a> {
    pub fn new(deps: &'a AppDeps, policy: UploadPolicy) -> Self {
        Self { deps, policy }
    }

    pub fn submit_cropped_image(&self) -> SubmitCroppedImage {
        SubmitCroppedImage::new(self.deps.image_processor.clone())
    }

    pub fn finalize_package(&self) -> FinalizePackageForCart {
        FinalizePackageForCart::new(
            self.deps.blob_uploader.clone(),
            self.deps.image_processor.clone(),
            self.policy.clone(),
        )
    }

    pub fn submit_checkout(&self) -> SubmitCheckout {
        SubmitCheckout::new(self.deps.order_api.clone())
    }
}
