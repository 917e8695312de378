//! # Application dependencies
//!
//! Parameter grouping for the use cases. Not a builder: no defaults, no
//! construction logic, every port is required.

use std::sync::Arc;

use mg_core::ports::*;

pub struct AppDeps {
    // Storage
    pub cart_store: Arc<dyn CartStorePort>,
    pub blob_uploader: Arc<dyn BlobUploadPort>,

    // Services
    pub order_api: Arc<dyn OrderApiPort>,
    pub image_processor: Arc<dyn ImageProcessorPort>,
}
