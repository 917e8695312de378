use base64::Engine;
use bytes::Bytes;

use crate::ids::StagedImageId;

/// Derived representations of one cropped image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub full_image: Bytes,
    pub full_mime_type: String,
    pub thumbnail: Bytes,
    pub thumbnail_mime_type: String,
}

/// A cropped image held in memory until the package is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub id: StagedImageId,
    pub full_image: Bytes,
    pub full_mime_type: String,
    pub thumbnail: Bytes,
    pub thumbnail_mime_type: String,
    pub display_name: String,
}

impl StagedImage {
    pub fn from_processed(processed: ProcessedImage, display_name: impl Into<String>) -> Self {
        Self {
            id: StagedImageId::new(),
            full_image: processed.full_image,
            full_mime_type: processed.full_mime_type,
            thumbnail: processed.thumbnail,
            thumbnail_mime_type: processed.thumbnail_mime_type,
            display_name: display_name.into(),
        }
    }

    /// Thumbnail as an inline `data:` URI for cart previews.
    pub fn thumbnail_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.thumbnail_mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.thumbnail)
        )
    }

    /// Storage file name: `<id>.<ext>` derived from the full image type.
    pub fn upload_file_name(&self) -> String {
        let ext = match self.full_mime_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        };
        format!("{}.{}", self.id, ext)
    }
}
