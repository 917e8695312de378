//! Package builder: package selection, sequential crop queue and assembly
//! of staged images into a package line item.
//!
//! ```text
//! Idle → PackageSelected → CroppingImage ⇄ (until queue drained)
//!      → PackageIncomplete / PackageComplete → (upload) → cart item
//! ```

mod file;
mod package_builder;
mod queue;
mod staged;

pub use file::{AcceptedImageType, IncomingFile, DEFAULT_MAX_FILE_BYTES};
pub use package_builder::{BuildState, Confirmation, CropStep, EnqueueOutcome, PackageBuilder};
pub use queue::{QueueStep, UploadQueue};
pub use staged::{ProcessedImage, StagedImage};
