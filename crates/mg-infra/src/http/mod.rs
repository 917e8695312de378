pub mod blob_uploader;
pub mod error;
pub mod order_client;

pub use blob_uploader::HttpBlobUploader;
pub use error::HttpAdapterError;
pub use order_client::HttpOrderClient;

use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, HttpAdapterError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(HttpAdapterError::from)
}

/// Joins `base` and `path` with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
