//! # mg-infra
//!
//! Adapters implementing the `mg-core` ports: SQLite cart storage, the
//! inline payload transform, local and HTTP blob uploads, the HTTP order
//! client, `image`-based crop processing and the system clock.

pub mod db;
pub mod fs;
pub mod http;
pub mod imaging;
pub mod persist;
pub mod time;

pub use db::executor::DieselSqliteExecutor;
pub use db::mappers::cart_state_mapper::CART_STORAGE_KEY;
pub use db::mappers::CartStateRowMapper;
pub use db::pool::{init_db_pool, DbPool};
pub use db::repositories::DieselCartStateRepository;
pub use fs::{FsBlobUploader, FsThumbnailCache};
pub use http::{HttpBlobUploader, HttpOrderClient};
pub use imaging::InfraImageProcessor;
pub use persist::InlinePayloadStrippingStore;
pub use time::SystemClock;
