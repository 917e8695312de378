use std::sync::Arc;
use tracing::{error, info};

use mg_core::ids::CheckoutAttemptId;
use mg_core::order::{Customer, OrderConfirmation, OrderRequest, Shipping};
use mg_core::ports::OrderApiPort;
use mg_core::CheckoutError;

use crate::cart_session::CartSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub customer: Customer,
    pub shipping: Shipping,
}

/// Submits the cart as an order. The cart is cleared only after the order
/// service accepts it.
pub struct SubmitCheckout {
    order_api: Arc<dyn OrderApiPort>,
}

impl SubmitCheckout {
    pub fn new(order_api: Arc<dyn OrderApiPort>) -> Self {
        Self { order_api }
    }

    pub async fn execute(
        &self,
        cart: &mut CartSession,
        details: CheckoutDetails,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.execute_with_attempt(cart, details, CheckoutAttemptId::new())
            .await
    }

    /// Same as [`SubmitCheckout::execute`] with a caller-held attempt id, so a
    /// retry after a failed submission carries the same id.
    #[tracing::instrument(
        name = "usecase.submit_checkout.execute",
        skip(self, cart, details),
        fields(attempt_id = %attempt_id)
    )]
    pub async fn execute_with_attempt(
        &self,
        cart: &mut CartSession,
        details: CheckoutDetails,
        attempt_id: CheckoutAttemptId,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let ledger = cart.ledger();
        if ledger.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = OrderRequest::new(
            attempt_id,
            details.customer,
            details.shipping,
            ledger.items(),
            ledger.total_amount(),
        );

        let confirmation = self.order_api.create_order(&request).await.map_err(|e| {
            error!(error = %e, "Order submission failed, cart kept");
            CheckoutError::from(e)
        })?;

        cart.clear_cart().await;
        info!(order_id = %confirmation.order_id, "Order placed, cart cleared");
        Ok(confirmation)
    }
}
