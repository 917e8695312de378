//! Order submission payloads exchanged with the order API.

use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, StoredLineItem};
use crate::ids::CheckoutAttemptId;
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Customer {
    User { user_id: String },
    Guest { contact: GuestContact },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shipping {
    SavedAddress { address_id: String },
    Address { address: ShippingAddress },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub attempt_id: CheckoutAttemptId,
    pub customer: Customer,
    pub shipping: Shipping,
    pub items: Vec<StoredLineItem>,
    pub total: Money,
}

impl OrderRequest {
    pub fn new(
        attempt_id: CheckoutAttemptId,
        customer: Customer,
        shipping: Shipping,
        items: &[CartLineItem],
        total: Money,
    ) -> Self {
        Self {
            attempt_id,
            customer,
            shipping,
            items: items
                .iter()
                .map(|item| {
                    // previews are local display data, the order only needs uploaded urls
                    let mut stored = item.to_stored();
                    stored.previews.clear();
                    stored
                })
                .collect(),
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_customer_serializes_with_kind_tag() {
        let customer = Customer::Guest {
            contact: GuestContact {
                email: "a@example.com".to_string(),
                name: "A".to_string(),
                phone: None,
            },
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["kind"], "guest");
        assert_eq!(json["contact"]["email"], "a@example.com");
        assert!(json["contact"].get("phone").is_none());
    }

    #[test]
    fn test_order_items_omit_inline_previews() {
        let tier = crate::catalog::find_package("6").unwrap();
        let item = CartLineItem::package(
            "pkg-1".into(),
            tier,
            crate::cart::Finish::Gloss,
            vec!["https://cdn.example.com/0.jpg".to_string()],
            vec![format!("data:image/webp;base64,{}", "A".repeat(4096))],
        );

        let request = OrderRequest::new(
            CheckoutAttemptId::from("attempt-1"),
            Customer::User {
                user_id: "u1".to_string(),
            },
            Shipping::SavedAddress {
                address_id: "home".to_string(),
            },
            std::slice::from_ref(&item),
            item.total_price(),
        );

        assert!(request.items[0].previews.is_empty());
        assert_eq!(request.items[0].images, item.images);
        assert!(request.items[0].custom_data.is_some());
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("data:image/webp"));
    }
}
