use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use mg_core::order::{OrderConfirmation, OrderRequest};
use mg_core::ports::OrderApiPort;

use super::error::{ensure_success, HttpAdapterError};
use super::{build_client, join_url, DEFAULT_TIMEOUT};

const ORDERS_PATH: &str = "orders";
const ATTEMPT_HEADER: &str = "Idempotency-Key";

/// Order API over HTTP: `POST {base}/orders` with the request as JSON.
pub struct HttpOrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpAdapterError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpAdapterError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl OrderApiPort for HttpOrderClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderConfirmation> {
        let url = join_url(&self.base_url, ORDERS_PATH);
        debug!(url = %url, attempt_id = %request.attempt_id, items = request.items.len(), "Submitting order");

        let response = self
            .client
            .post(&url)
            .header(ATTEMPT_HEADER, request.attempt_id.as_str())
            .json(request)
            .send()
            .await
            .map_err(HttpAdapterError::from)?;
        let response = ensure_success(response).await?;
        let confirmation: OrderConfirmation =
            response.json().await.map_err(HttpAdapterError::from)?;

        info!(order_id = %confirmation.order_id, status = %confirmation.status, "Order accepted");
        Ok(confirmation)
    }
}
