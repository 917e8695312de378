//! # Dependency wiring
//!
//! The only place that depends on `mg-infra` and `mg-app` together. It builds
//! adapters from [`StoreConfig`] and groups them into [`AppDeps`]; it makes
//! no business decisions.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use mg_app::{AppDeps, CartSession, UploadPolicy, UseCases};
use mg_core::order::{OrderConfirmation, OrderRequest};
use mg_core::ports::{BlobUploadPort, CartStorePort, OrderApiPort, ThumbnailCachePort};
use mg_core::{PackageBuilder, StoreConfig};
use mg_infra::{
    init_db_pool, CartStateRowMapper, DbPool, DieselCartStateRepository, DieselSqliteExecutor,
    FsBlobUploader, FsThumbnailCache, HttpBlobUploader, HttpOrderClient, InfraImageProcessor,
    InlinePayloadStrippingStore, SystemClock, CART_STORAGE_KEY,
};

pub type WiringResult<T> = Result<T, WiringError>;

/// Infrastructure initialisation failures.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(String),
}

/// Stand-in used when no order API URL is configured; every submission fails.
struct UnconfiguredOrderApi;

#[async_trait]
impl OrderApiPort for UnconfiguredOrderApi {
    async fn create_order(&self, _request: &OrderRequest) -> Result<OrderConfirmation> {
        anyhow::bail!("order API URL is not configured ([api] order_api_url)")
    }
}

/// Everything a front end needs to drive one storefront session.
pub struct WiredApp {
    pub deps: AppDeps,
    upload_policy: UploadPolicy,
    max_file_bytes: u64,
}

impl WiredApp {
    pub fn use_cases(&self) -> UseCases<'_> {
        UseCases::new(&self.deps, self.upload_policy.clone())
    }

    /// Cart session over the durable store; call `init()` before use.
    pub fn cart_session(&self) -> CartSession {
        CartSession::new(self.deps.cart_store.clone())
    }

    pub fn package_builder(&self) -> PackageBuilder {
        PackageBuilder::with_max_file_bytes(self.max_file_bytes)
    }
}

fn create_db_pool(db_path: &Path) -> WiringResult<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiringError::DatabaseInit(format!("Failed to create DB directory: {}", e))
        })?;
    }

    let db_url = db_path
        .to_str()
        .ok_or_else(|| WiringError::DatabaseInit("Invalid database path".to_string()))?;

    init_db_pool(db_url)
        .map_err(|e| WiringError::DatabaseInit(format!("Failed to initialize DB: {}", e)))
}

fn create_cart_store(config: &StoreConfig) -> WiringResult<Arc<dyn CartStorePort>> {
    let pool = create_db_pool(&config.database_path)?;
    let repository = DieselCartStateRepository::new(
        DieselSqliteExecutor::new(pool),
        CartStateRowMapper::new(CART_STORAGE_KEY, Arc::new(SystemClock)),
    );
    let cache: Arc<dyn ThumbnailCachePort> =
        Arc::new(FsThumbnailCache::new(config.thumbnail_cache_dir.clone()));

    Ok(Arc::new(InlinePayloadStrippingStore::new(
        repository,
        cache,
        config.inline_threshold_bytes,
    )))
}

fn create_blob_uploader(config: &StoreConfig) -> WiringResult<Arc<dyn BlobUploadPort>> {
    if config.blob_upload_url.is_empty() {
        info!(dir = %config.blob_dir.display(), "Storing package images locally");
        return Ok(Arc::new(FsBlobUploader::new(config.blob_dir.clone())));
    }
    let uploader = HttpBlobUploader::new(config.blob_upload_url.clone())
        .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;
    Ok(Arc::new(uploader))
}

fn create_order_api(config: &StoreConfig) -> WiringResult<Arc<dyn OrderApiPort>> {
    if config.order_api_url.is_empty() {
        info!("No order API configured, checkout disabled");
        return Ok(Arc::new(UnconfiguredOrderApi));
    }
    let client = HttpOrderClient::new(config.order_api_url.clone())
        .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;
    Ok(Arc::new(client))
}

pub fn wire_dependencies(config: &StoreConfig) -> WiringResult<WiredApp> {
    let deps = AppDeps {
        cart_store: create_cart_store(config)?,
        blob_uploader: create_blob_uploader(config)?,
        order_api: create_order_api(config)?,
        image_processor: Arc::new(InfraImageProcessor::new(config.thumbnail_max_edge)),
    };

    Ok(WiredApp {
        deps,
        upload_policy: UploadPolicy {
            recompress_threshold_bytes: config.upload_recompress_threshold_bytes,
            recompress_quality: config.recompress_quality,
            cleanup_orphaned_uploads: config.cleanup_orphaned_uploads,
        },
        max_file_bytes: config.max_file_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mg_core::order::{Customer, Shipping};
    use mg_core::CheckoutAttemptId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unconfigured_order_api_always_fails() {
        let request = OrderRequest::new(
            CheckoutAttemptId::new(),
            Customer::User {
                user_id: "u".to_string(),
            },
            Shipping::SavedAddress {
                address_id: "a".to_string(),
            },
            &[],
            mg_core::Money::ZERO,
        );
        let err = UnconfiguredOrderApi.create_order(&request).await.unwrap_err();
        assert!(err.to_string().contains("order_api_url"));
    }

    #[test]
    fn test_wiring_creates_database_directory() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::defaults(dir.path().join("nested"));

        let app = wire_dependencies(&config).unwrap();

        assert!(config.database_path.exists());
        assert_eq!(app.package_builder().remaining_slots(), 0);
    }
}
