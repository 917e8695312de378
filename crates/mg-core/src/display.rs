//! Checkout grouping and pricing read model.
//!
//! Pure transforms over ledger items; nothing here mutates the cart.

use serde::Serialize;

use crate::cart::{CartLedger, CartLineItem, Finish, LineItemKind};
use crate::catalog::BASELINE_UNIT_PRICE;
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageView {
    pub item_id: String,
    pub name: String,
    pub package_id: String,
    pub size: usize,
    pub finish: Finish,
    pub images: Vec<String>,
    pub previews: Vec<String>,
    /// `images / size`, capped at 1.
    pub completion: f64,
    pub price: Money,
    pub quantity: u32,
    pub total_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleView {
    pub item_id: String,
    pub name: String,
    pub images: Vec<String>,
    pub price: Money,
    pub quantity: u32,
    pub total_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayItem {
    Package(PackageView),
    Simple(SimpleView),
}

impl DisplayItem {
    pub fn is_package(&self) -> bool {
        matches!(self, DisplayItem::Package(_))
    }

    pub fn images(&self) -> &[String] {
        match self {
            DisplayItem::Package(view) => &view.images,
            DisplayItem::Simple(view) => &view.images,
        }
    }
}

/// Everything a checkout page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub items: Vec<DisplayItem>,
    pub total_quantity: u32,
    pub total_amount: Money,
    pub magnet_count: u64,
    pub savings: Money,
}

impl CheckoutSummary {
    pub fn from_ledger(ledger: &CartLedger) -> Self {
        let items = ledger.items();
        Self {
            items: group_for_display(items),
            total_quantity: ledger.total_quantity(),
            total_amount: ledger.total_amount(),
            magnet_count: items.iter().map(CartLineItem::magnet_count).sum(),
            savings: savings(items, ledger.total_amount()),
        }
    }
}

pub fn group_for_display(items: &[CartLineItem]) -> Vec<DisplayItem> {
    items.iter().map(display_item).collect()
}

fn display_item(item: &CartLineItem) -> DisplayItem {
    match &item.kind {
        LineItemKind::Package(details) => {
            let completion = if details.size == 0 {
                0.0
            } else {
                (item.images.len() as f64 / details.size as f64).min(1.0)
            };
            DisplayItem::Package(PackageView {
                item_id: item.id.to_string(),
                name: item.name.clone(),
                package_id: details.package_id.clone(),
                size: details.size,
                finish: details.finish,
                images: item.images.clone(),
                previews: item.previews.clone(),
                completion,
                price: item.price,
                quantity: item.quantity(),
                total_price: item.total_price(),
            })
        }
        LineItemKind::Simple => DisplayItem::Simple(SimpleView {
            item_id: item.id.to_string(),
            name: item.name.clone(),
            images: item.images.clone(),
            price: item.price,
            quantity: item.quantity(),
            total_price: item.total_price(),
        }),
    }
}

/// What the magnets would cost at the single-magnet price, minus what the
/// cart actually costs. Never negative.
pub fn savings(items: &[CartLineItem], total_amount: Money) -> Money {
    let magnets: u64 = items.iter().map(CartLineItem::magnet_count).sum();
    let baseline = Money::from_pence(BASELINE_UNIT_PRICE.pence().saturating_mul(magnets as i64));
    baseline.saturating_sub(total_amount)
}
