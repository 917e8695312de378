use std::sync::Arc;

use anyhow::{Context, Result};
use mg_core::cart::StoredCart;
use mg_core::ports::ClockPort;

use crate::db::models::{CartStateRow, NewCartStateRow};
use crate::db::ports::{InsertMapper, RowMapper};

/// Default key under which the storefront cart is kept.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Maps the cart to its JSON payload row.
pub struct CartStateRowMapper {
    storage_key: String,
    clock: Arc<dyn ClockPort>,
}

impl CartStateRowMapper {
    pub fn new(storage_key: impl Into<String>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            storage_key: storage_key.into(),
            clock,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl InsertMapper<StoredCart, NewCartStateRow> for CartStateRowMapper {
    fn to_row(&self, domain: &StoredCart) -> Result<NewCartStateRow> {
        Ok(NewCartStateRow {
            storage_key: self.storage_key.clone(),
            payload: serde_json::to_string(domain).context("serialize cart payload")?,
            updated_at: self.clock.now_ms(),
        })
    }
}

impl RowMapper<CartStateRow, StoredCart> for CartStateRowMapper {
    fn to_domain(&self, row: &CartStateRow) -> Result<StoredCart> {
        serde_json::from_str(&row.payload)
            .with_context(|| format!("parse cart payload for key {}", row.storage_key))
    }
}
