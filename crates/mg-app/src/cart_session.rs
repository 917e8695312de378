//! # Cart session
//!
//! Explicitly constructed owner of the cart for one application session.
//! Lifecycle: [`CartSession::init`] → mutations → [`CartSession::teardown`].
//!
//! Every mutation that changes the ledger is followed by a write to the
//! durable store. Store failures are logged and swallowed: the in-memory
//! ledger stays authoritative.

use std::sync::Arc;

use mg_core::cart::{CartLedger, CartLineItem};
use mg_core::display::CheckoutSummary;
use mg_core::ports::CartStorePort;
use tracing::{debug, info, warn};

pub struct CartSession {
    ledger: CartLedger,
    store: Arc<dyn CartStorePort>,
}

impl CartSession {
    /// Creates an empty session. Call [`CartSession::init`] to load the
    /// stored cart.
    pub fn new(store: Arc<dyn CartStorePort>) -> Self {
        Self {
            ledger: CartLedger::new(),
            store,
        }
    }

    /// Loads the stored cart. A missing or unreadable cart starts empty.
    #[tracing::instrument(name = "cart_session.init", skip(self))]
    pub async fn init(&mut self) {
        match self.store.load().await {
            Ok(Some(stored)) => {
                self.ledger = CartLedger::from_stored(stored);
                info!(
                    items = self.ledger.len(),
                    total_amount = %self.ledger.total_amount(),
                    "Cart restored"
                );
            }
            Ok(None) => {
                debug!("No stored cart, starting empty");
                self.ledger = CartLedger::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to load stored cart, starting empty");
                self.ledger = CartLedger::new();
            }
        }
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary::from_ledger(&self.ledger)
    }

    pub async fn add_item(&mut self, item: CartLineItem) -> usize {
        let position = self.ledger.add_item(item);
        self.persist().await;
        position
    }

    pub async fn remove_item(&mut self, position: usize) -> Option<CartLineItem> {
        let removed = self.ledger.remove_item(position);
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    pub async fn update_quantity(&mut self, position: usize, quantity: u32) -> bool {
        let changed = self.ledger.update_quantity(position, quantity);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn clear_cart(&mut self) {
        self.ledger.clear_cart();
        self.persist().await;
    }

    /// Final flush; returns the ledger as it was written.
    #[tracing::instrument(name = "cart_session.teardown", skip(self))]
    pub async fn teardown(self) -> CartLedger {
        self.persist().await;
        self.ledger
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.ledger.to_stored()).await {
            warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use mg_core::cart::StoredCart;
    use mg_core::money::Money;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        cart: Mutex<Option<StoredCart>>,
        saves: AtomicUsize,
        fail_save: bool,
        fail_load: bool,
    }

    #[async_trait]
    impl CartStorePort for MemoryStore {
        async fn load(&self) -> Result<Option<StoredCart>> {
            if self.fail_load {
                return Err(anyhow::anyhow!("Mock load error"));
            }
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn save(&self, cart: &StoredCart) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_save {
                return Err(anyhow::anyhow!("Mock save error"));
            }
            *self.cart.lock().unwrap() = Some(cart.clone());
            Ok(())
        }
    }

    fn simple(id: &str, pence: i64) -> CartLineItem {
        CartLineItem::simple(id.into(), id, Money::from_pence(pence))
    }

    #[tokio::test]
    async fn test_mutations_are_written_through() {
        let store = Arc::new(MemoryStore::default());
        let mut session = CartSession::new(store.clone());
        session.init().await;

        session.add_item(simple("a", 500)).await;
        session.add_item(simple("a", 500)).await;
        session.update_quantity(0, 3).await;

        let stored = store.cart.lock().unwrap().clone().unwrap();
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].quantity, 3);
        assert_eq!(stored.total_amount, Money::gbp(15, 0));
        assert_eq!(store.saves.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_noop_mutations_do_not_write() {
        let store = Arc::new(MemoryStore::default());
        let mut session = CartSession::new(store.clone());
        session.init().await;

        assert!(session.remove_item(0).await.is_none());
        assert!(!session.update_quantity(3, 2).await);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_init_restores_previous_session() {
        let store = Arc::new(MemoryStore::default());
        {
            let mut first = CartSession::new(store.clone());
            first.init().await;
            first.add_item(simple("a", 283)).await;
            first.teardown().await;
        }

        let mut second = CartSession::new(store.clone());
        second.init().await;
        assert_eq!(second.ledger().len(), 1);
        assert_eq!(second.ledger().total_amount(), Money::from_pence(283));
    }

    #[tokio::test]
    async fn test_store_failures_are_swallowed() {
        let store = Arc::new(MemoryStore {
            fail_save: true,
            fail_load: true,
            ..Default::default()
        });
        let mut session = CartSession::new(store.clone());
        session.init().await;
        assert!(session.ledger().is_empty());

        session.add_item(simple("a", 100)).await;
        assert_eq!(session.ledger().total_amount(), Money::from_pence(100));
    }
}
