use anyhow::Result;
use async_trait::async_trait;

use crate::order::{OrderConfirmation, OrderRequest};

/// External order-creation service.
///
/// No de-duplication is promised by this contract; `attempt_id` is forwarded
/// so an implementation can offer it.
#[async_trait]
pub trait OrderApiPort: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderConfirmation>;
}
