//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Identity of a cart line item. `add_item` merges entries sharing this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

/// Identity of an image staged in the package builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagedImageId(String);

/// One checkout attempt. Forwarded to the order API so retries can be recognised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutAttemptId(String);

impl_id!(LineItemId, StagedImageId, CheckoutAttemptId);
