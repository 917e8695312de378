//! Cart persistence transform.
//!
//! Inline `data:` previews can be large. Before a write they are moved to
//! the thumbnail cache and replaced by `local-cache://` references; after a
//! read the references are resolved again, dropping whatever the cache lost.

mod inline_payload_store;

pub use inline_payload_store::{InlinePayloadStrippingStore, LOCAL_CACHE_SCHEME};
