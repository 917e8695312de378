//! File validation primitives for photo uploads.

use bytes::Bytes;

/// Upload limit per raw file: 10 MB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Image types accepted by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcceptedImageType {
    Jpeg,
    Png,
    Webp,
}

impl AcceptedImageType {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// A raw file picked by the customer, before cropping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Bytes,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    /// A file whose declared size differs from its buffered bytes, as the
    /// browser reports it before the payload is read.
    pub fn with_declared_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn image_type(&self) -> Option<AcceptedImageType> {
        AcceptedImageType::from_mime(&self.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_jpeg_png_webp_are_accepted() {
        assert_eq!(AcceptedImageType::from_mime("image/jpeg"), Some(AcceptedImageType::Jpeg));
        assert_eq!(AcceptedImageType::from_mime("IMAGE/PNG"), Some(AcceptedImageType::Png));
        assert_eq!(AcceptedImageType::from_mime("image/webp"), Some(AcceptedImageType::Webp));
        assert_eq!(AcceptedImageType::from_mime("image/gif"), None);
        assert_eq!(AcceptedImageType::from_mime("application/pdf"), None);
    }

    #[test]
    fn test_size_defaults_to_buffer_length() {
        let file = IncomingFile::new("a.jpg", "image/jpeg", vec![0u8; 42]);
        assert_eq!(file.size_bytes, 42);
        assert_eq!(file.with_declared_size(7).size_bytes, 7);
    }
}
