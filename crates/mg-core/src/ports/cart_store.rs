use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::cart::StoredCart;

/// Durable key-value storage for the cart, read at session start and
/// written after every mutation.
#[async_trait]
pub trait CartStorePort: Send + Sync {
    /// `Ok(None)` when nothing was stored yet.
    async fn load(&self) -> Result<Option<StoredCart>>;
    async fn save(&self, cart: &StoredCart) -> Result<()>;
}

#[async_trait]
impl<T: CartStorePort + ?Sized> CartStorePort for Arc<T> {
    async fn load(&self) -> Result<Option<StoredCart>> {
        (**self).load().await
    }

    async fn save(&self, cart: &StoredCart) -> Result<()> {
        (**self).save(cart).await
    }
}
