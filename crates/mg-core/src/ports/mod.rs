//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the services the
//! storefront runs on (blob storage, order API, durable cart storage, local
//! thumbnail cache, image processing). Infrastructure adapters implement
//! them; the domain never depends on a concrete service.

mod blob_upload;
mod cart_store;
mod clock;
mod image_processor;
mod order_api;
mod thumbnail_cache;

pub use blob_upload::{BlobUploadPort, UploadedBlob};
pub use cart_store::CartStorePort;
pub use clock::ClockPort;
pub use image_processor::ImageProcessorPort;
pub use order_api::OrderApiPort;
pub use thumbnail_cache::ThumbnailCachePort;
