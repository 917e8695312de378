use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use mg_core::builder::{CropStep, PackageBuilder};
use mg_core::ports::ImageProcessorPort;
use mg_core::BuilderError;

/// Turns the crop result for the current queued file into a staged image.
pub struct SubmitCroppedImage {
    processor: Arc<dyn ImageProcessorPort>,
}

impl SubmitCroppedImage {
    pub fn new(processor: Arc<dyn ImageProcessorPort>) -> Self {
        Self { processor }
    }

    /// Fails with [`BuilderError::NoActiveCropSession`] before doing any
    /// image work when no file is being cropped.
    #[tracing::instrument(
        name = "usecase.submit_cropped_image.execute",
        skip(self, builder, cropped),
        fields(bytes = cropped.len())
    )]
    pub async fn execute(&self, builder: &mut PackageBuilder, cropped: &[u8]) -> Result<CropStep> {
        let Some(current) = builder.current_file() else {
            return Err(BuilderError::NoActiveCropSession.into());
        };
        debug!(file = %current.name, "Processing crop");

        let processed = self.processor.process_crop(cropped).await?;
        let step = builder.submit_cropped_image(processed)?;
        Ok(step)
    }
}
