pub mod blob_uploader;
pub mod thumbnail_cache;

pub use blob_uploader::FsBlobUploader;
pub use thumbnail_cache::FsThumbnailCache;
