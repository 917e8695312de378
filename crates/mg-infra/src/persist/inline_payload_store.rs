use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use mg_core::cart::{StoredCart, StoredLineItem};
use mg_core::ports::{CartStorePort, ThumbnailCachePort};

pub const LOCAL_CACHE_SCHEME: &str = "local-cache://";
const DATA_URI_PREFIX: &str = "data:";

#[derive(Clone, Copy)]
enum Field {
    Images,
    Previews,
}

impl Field {
    fn cache_key(self, item_id: &str, index: usize) -> String {
        match self {
            Field::Images => format!("{item_id}:{index}"),
            Field::Previews => format!("{item_id}:preview-{index}"),
        }
    }
}

/// [`CartStorePort`] decorator applying the inline payload transform.
pub struct InlinePayloadStrippingStore<S> {
    inner: S,
    cache: Arc<dyn ThumbnailCachePort>,
    inline_threshold_bytes: usize,
}

impl<S> InlinePayloadStrippingStore<S> {
    pub fn new(inner: S, cache: Arc<dyn ThumbnailCachePort>, inline_threshold_bytes: usize) -> Self {
        Self {
            inner,
            cache,
            inline_threshold_bytes,
        }
    }

    async fn strip_entries(&self, item_id: &str, field: Field, entries: &mut [String]) {
        for (index, entry) in entries.iter_mut().enumerate() {
            if !entry.starts_with(DATA_URI_PREFIX) || entry.len() <= self.inline_threshold_bytes {
                continue;
            }
            let key = field.cache_key(item_id, index);
            if let Err(e) = self.cache.store(&key, entry.as_bytes()).await {
                warn!(key = %key, error = %e, "Failed to cache inline payload, dropping it");
            } else {
                debug!(key = %key, bytes = entry.len(), "Moved inline payload to cache");
            }
            *entry = format!("{LOCAL_CACHE_SCHEME}{key}");
        }
    }

    /// Resolves cache refs in order. Returns the resolved entries and
    /// whether any ref could not be resolved; unresolved refs are dropped.
    async fn restore_entries(&self, entries: Vec<String>) -> (Vec<String>, bool) {
        let mut restored = Vec::with_capacity(entries.len());
        let mut missed = false;
        for entry in entries {
            let Some(key) = entry.strip_prefix(LOCAL_CACHE_SCHEME) else {
                restored.push(entry);
                continue;
            };
            match self.cache.try_restore(key).await {
                Some(data) => match String::from_utf8(data.to_vec()) {
                    Ok(uri) => restored.push(uri),
                    Err(_) => {
                        warn!(key, "Cached payload is not valid UTF-8, dropping");
                        missed = true;
                    }
                },
                None => {
                    debug!(key, "Cached payload missing, dropping");
                    missed = true;
                }
            }
        }
        (restored, missed)
    }

    async fn strip_item(&self, item: &mut StoredLineItem) {
        let id = item.id.clone();
        self.strip_entries(&id, Field::Images, &mut item.images).await;
        self.strip_entries(&id, Field::Previews, &mut item.previews).await;
    }

    /// Previews are index-aligned with images, so a single miss on either
    /// list drops every preview of the item.
    async fn restore_item(&self, mut item: StoredLineItem) -> StoredLineItem {
        let (images, images_missed) = self.restore_entries(std::mem::take(&mut item.images)).await;
        let (previews, previews_missed) =
            self.restore_entries(std::mem::take(&mut item.previews)).await;
        item.images = images;
        item.previews = if images_missed || previews_missed {
            debug!(item_id = %item.id, "Dropping previews of item with missing cache entries");
            Vec::new()
        } else {
            previews
        };
        item
    }

    /// Deletes cache entries referenced by `previous` but not by `current`.
    async fn prune_stale_entries(&self, previous: &StoredCart, current: &StoredCart) {
        let live = cache_keys(current);
        for key in cache_keys(previous).difference(&live) {
            match self.cache.remove(key).await {
                Ok(()) => debug!(key = %key, "Pruned stale cache entry"),
                Err(e) => warn!(key = %key, error = %e, "Failed to prune stale cache entry"),
            }
        }
    }
}

fn cache_keys(cart: &StoredCart) -> HashSet<String> {
    cart.items
        .iter()
        .flat_map(|item| item.images.iter().chain(item.previews.iter()))
        .filter_map(|entry| entry.strip_prefix(LOCAL_CACHE_SCHEME))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl<S: CartStorePort> CartStorePort for InlinePayloadStrippingStore<S> {
    async fn load(&self) -> Result<Option<StoredCart>> {
        let Some(mut cart) = self.inner.load().await? else {
            return Ok(None);
        };
        let mut items = Vec::with_capacity(cart.items.len());
        for item in std::mem::take(&mut cart.items) {
            items.push(self.restore_item(item).await);
        }
        cart.items = items;
        Ok(Some(cart))
    }

    async fn save(&self, cart: &StoredCart) -> Result<()> {
        let previous = match self.inner.load().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "Could not read previous cart, skipping cache pruning");
                None
            }
        };

        let mut stripped = cart.clone();
        for item in &mut stripped.items {
            self.strip_item(item).await;
        }
        self.inner.save(&stripped).await?;

        if let Some(previous) = previous {
            self.prune_stale_entries(&previous, &stripped).await;
        }
        Ok(())
    }
}
