//! Persisted wire shape of the cart.
//!
//! The storefront historically kept package metadata as a JSON string in
//! `custom_data`. That string is parsed exactly once, in
//! [`CartLineItem::from_stored`]; anything that does not parse degrades to a
//! simple item without images.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::line_item::{CartLineItem, Finish, LineItemKind, PackageDetails};
use crate::money::Money;

pub const PACKAGE_CUSTOM_DATA_TYPE: &str = "custom_magnet_package";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLineItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    #[serde(rename = "totalPrice", default)]
    pub total_price: Money,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previews: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCart {
    #[serde(default)]
    pub items: Vec<StoredLineItem>,
    #[serde(rename = "totalQuantity", default)]
    pub total_quantity: u32,
    #[serde(rename = "totalAmount", default)]
    pub total_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageCustomData {
    #[serde(rename = "type")]
    kind: String,
    package_id: String,
    package_name: String,
    size: usize,
    #[serde(default)]
    finish: Option<String>,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    image_count: Option<usize>,
}

impl CartLineItem {
    /// Builds a typed line item from its persisted form. Never fails.
    pub fn from_stored(stored: StoredLineItem) -> Self {
        let StoredLineItem {
            id,
            name,
            price,
            quantity,
            images,
            previews,
            custom_data,
            ..
        } = stored;

        let mut item = CartLineItem::simple(id.into(), name, price);

        match custom_data.as_deref() {
            None => {
                item.images = images;
                item.previews = previews;
                item.set_quantity(quantity.max(1));
            }
            Some(raw) => match serde_json::from_str::<PackageCustomData>(raw) {
                Ok(data) if data.kind == PACKAGE_CUSTOM_DATA_TYPE => {
                    let images = if images.is_empty() {
                        data.image_urls
                    } else {
                        images
                    };
                    item.kind = LineItemKind::Package(PackageDetails {
                        package_id: data.package_id,
                        package_name: data.package_name,
                        size: data.size,
                        finish: data
                            .finish
                            .as_deref()
                            .map(Finish::parse_lenient)
                            .unwrap_or_default(),
                        image_count: data.image_count.unwrap_or(images.len()),
                    });
                    item.images = images;
                    item.previews = previews;
                    // the package itself is the unit
                    item.set_quantity(1);
                }
                Ok(data) => {
                    warn!(item_id = %item.id, custom_type = %data.kind, "Unknown custom_data type, treating as simple item");
                    item.images = images;
                    item.previews = previews;
                    item.set_quantity(quantity.max(1));
                }
                Err(e) => {
                    warn!(item_id = %item.id, error = %e, "Unparsable custom_data, degrading to simple item without images");
                    item.set_quantity(quantity.max(1));
                }
            },
        }

        item
    }

    pub fn to_stored(&self) -> StoredLineItem {
        let custom_data = self.package_details().map(|details| {
            let data = PackageCustomData {
                kind: PACKAGE_CUSTOM_DATA_TYPE.to_string(),
                package_id: details.package_id.clone(),
                package_name: details.package_name.clone(),
                size: details.size,
                finish: Some(details.finish.as_str().to_string()),
                image_urls: self.images.clone(),
                image_count: Some(details.image_count),
            };
            // A struct of strings and integers always serializes.
            serde_json::to_string(&data).unwrap_or_default()
        });

        StoredLineItem {
            id: self.id.to_string(),
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity(),
            total_price: self.total_price(),
            images: self.images.clone(),
            previews: self.previews.clone(),
            custom_data,
        }
    }
}
