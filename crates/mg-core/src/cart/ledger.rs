use tracing::debug;

use super::line_item::CartLineItem;
use super::stored::StoredCart;
use crate::money::Money;

/// Read-only copy of the ledger at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total_quantity: u32,
    pub total_amount: Money,
}

/// Authoritative list of cart line items with derived totals.
///
/// `total_amount` is re-summed over every item after each structural
/// mutation; it is never adjusted by deltas alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    items: Vec<CartLineItem>,
    total_quantity: u32,
    total_amount: Money,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from items, deriving both totals from scratch.
    pub fn restore(items: Vec<CartLineItem>) -> Self {
        let mut ledger = Self {
            items,
            total_quantity: 0,
            total_amount: Money::ZERO,
        };
        ledger.recompute_totals();
        ledger
    }

    /// Rebuilds a ledger from its persisted form. Stored totals are ignored.
    pub fn from_stored(stored: StoredCart) -> Self {
        Self::restore(
            stored
                .items
                .into_iter()
                .map(CartLineItem::from_stored)
                .collect(),
        )
    }

    pub fn to_stored(&self) -> StoredCart {
        StoredCart {
            items: self.items.iter().map(CartLineItem::to_stored).collect(),
            total_quantity: self.total_quantity,
            total_amount: self.total_amount,
        }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_quantity: self.total_quantity,
            total_amount: self.total_amount,
        }
    }

    /// Adds one unit of `item`.
    ///
    /// An entry with the same id gets its quantity bumped; otherwise the
    /// item is appended with quantity 1. A package already in the cart stays
    /// at quantity 1. Returns the entry's position.
    pub fn add_item(&mut self, mut item: CartLineItem) -> usize {
        let position = match self.items.iter().position(|existing| existing.id == item.id) {
            Some(position) if self.items[position].is_package() => {
                debug!(position, item_id = %item.id, "add_item ignored: package already in cart");
                return position;
            }
            Some(position) => {
                let existing = &mut self.items[position];
                let quantity = existing.quantity().saturating_add(1);
                existing.set_quantity(quantity);
                position
            }
            None => {
                item.set_quantity(1);
                self.items.push(item);
                self.items.len() - 1
            }
        };

        self.total_quantity = self.total_quantity.saturating_add(1);
        self.total_amount = self.resum_amount();
        position
    }

    /// Removes the entry at `position`. Out-of-range positions are ignored.
    pub fn remove_item(&mut self, position: usize) -> Option<CartLineItem> {
        if position >= self.items.len() {
            debug!(position, len = self.items.len(), "remove_item ignored: stale position");
            return None;
        }

        let removed_quantity = self.items[position].quantity();
        self.total_quantity = self.total_quantity.saturating_sub(removed_quantity);
        let removed = self.items.remove(position);
        self.total_amount = self.resum_amount();
        Some(removed)
    }

    /// Sets the quantity of a simple entry.
    ///
    /// Returns `false` without touching anything when the position is stale,
    /// the quantity is zero, or the entry is a package (fixed at one).
    pub fn update_quantity(&mut self, position: usize, quantity: u32) -> bool {
        let Some(item) = self.items.get_mut(position) else {
            debug!(position, "update_quantity ignored: stale position");
            return false;
        };
        if quantity < 1 {
            debug!(position, quantity, "update_quantity ignored: quantity below one");
            return false;
        }
        if item.is_package() {
            debug!(position, "update_quantity ignored: package quantity is fixed");
            return false;
        }

        item.set_quantity(quantity);
        self.recompute_totals();
        true
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.total_quantity = 0;
        self.total_amount = Money::ZERO;
    }

    fn resum_amount(&self) -> Money {
        self.items
            .iter()
            .map(|item| item.price.times(item.quantity()))
            .sum()
    }

    fn recompute_totals(&mut self) {
        self.total_quantity = self.items.iter().map(CartLineItem::quantity).sum();
        self.total_amount = self.resum_amount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::line_item::Finish;
    use crate::catalog::find_package;
    use crate::ids::LineItemId;

    fn simple(id: &str, pence: i64) -> CartLineItem {
        CartLineItem::simple(id.into(), format!("item {id}"), Money::from_pence(pence))
    }

    fn package(size_id: &str) -> CartLineItem {
        let tier = find_package(size_id).unwrap();
        let urls = (0..tier.max_files).map(|i| format!("https://cdn/{i}.jpg")).collect();
        CartLineItem::package(LineItemId::new(), tier, Finish::Gloss, urls, vec![])
    }

    fn assert_invariants(ledger: &CartLedger) {
        let quantity: u32 = ledger.items().iter().map(|i| i.quantity()).sum();
        let amount: Money = ledger
            .items()
            .iter()
            .map(|i| i.price.times(i.quantity()))
            .sum();
        assert_eq!(ledger.total_quantity(), quantity);
        assert_eq!(ledger.total_amount(), amount);
        for item in ledger.items() {
            assert_eq!(item.total_price(), item.price.times(item.quantity()));
        }
    }

    #[test]
    fn test_adding_same_simple_item_twice_merges_quantity() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 500));
        ledger.add_item(simple("sku-1", 500));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.items()[0].quantity(), 2);
        assert_eq!(ledger.items()[0].total_price(), Money::gbp(10, 0));
        assert_eq!(ledger.total_amount(), Money::gbp(10, 0));
        assert_invariants(&ledger);
    }

    #[test]
    fn test_update_quantity_recomputes_total() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 283));

        assert!(ledger.update_quantity(0, 3));
        assert_eq!(ledger.total_amount(), Money::from_pence(849));
        assert_eq!(ledger.total_quantity(), 3);
    }

    #[test]
    fn test_update_quantity_rejects_zero_and_packages() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 283));
        ledger.add_item(package("6"));
        let before = ledger.clone();

        assert!(!ledger.update_quantity(0, 0));
        assert!(!ledger.update_quantity(1, 4));
        assert!(!ledger.update_quantity(7, 2));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 283));
        ledger.add_item(package("12"));
        let before = ledger.clone();

        assert!(ledger.remove_item(2).is_none());
        assert!(ledger.remove_item(usize::MAX).is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_item_subtracts_contribution() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 283));
        ledger.update_quantity(0, 2);
        ledger.add_item(package("6"));

        let removed = ledger.remove_item(0).unwrap();
        assert_eq!(removed.id.as_str(), "sku-1");
        assert_eq!(ledger.total_quantity(), 1);
        assert_eq!(ledger.total_amount(), Money::gbp(17, 0));
    }

    #[test]
    fn test_clear_cart_is_idempotent() {
        let mut ledger = CartLedger::new();
        ledger.add_item(simple("sku-1", 283));
        ledger.add_item(package("16"));

        ledger.clear_cart();
        let once = ledger.clone();
        ledger.clear_cart();

        assert_eq!(ledger, once);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_amount(), Money::ZERO);
        assert_eq!(ledger.total_quantity(), 0);
    }

    #[test]
    fn test_distinct_packages_never_merge() {
        let mut ledger = CartLedger::new();
        ledger.add_item(package("6"));
        ledger.add_item(package("6"));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_amount(), Money::gbp(34, 0));
    }

    #[test]
    fn test_re_adding_package_keeps_quantity_through_storage() {
        let mut ledger = CartLedger::new();
        let item = package("6");
        let first = ledger.add_item(item.clone());
        let second = ledger.add_item(item);

        assert_eq!(first, second);
        assert_eq!(ledger.items()[0].quantity(), 1);
        assert_eq!(ledger.total_quantity(), 1);
        assert_eq!(ledger.total_amount(), Money::gbp(17, 0));

        let restored = CartLedger::from_stored(ledger.to_stored());
        assert_eq!(restored.total_amount(), ledger.total_amount());
        assert_eq!(restored.total_quantity(), ledger.total_quantity());
        assert_invariants(&restored);
    }

    enum Op {
        Add(CartLineItem),
        Remove(usize),
        Update(usize, u32),
        Clear,
    }

    #[test]
    fn test_invariants_hold_across_mixed_mutations() {
        let ops = vec![
            Op::Add(simple("a", 199)),
            Op::Add(simple("b", 283)),
            Op::Add(simple("a", 199)),
            Op::Update(1, 7),
            Op::Add(package("9")),
            Op::Remove(0),
            Op::Remove(9),
            Op::Update(0, 1),
            Op::Update(0, 0),
            Op::Clear,
            Op::Add(simple("c", 1)),
        ];

        let mut ledger = CartLedger::new();
        for op in ops {
            match op {
                Op::Add(item) => {
                    ledger.add_item(item);
                }
                Op::Remove(position) => {
                    ledger.remove_item(position);
                }
                Op::Update(position, quantity) => {
                    ledger.update_quantity(position, quantity);
                }
                Op::Clear => ledger.clear_cart(),
            }
            assert_invariants(&ledger);
        }
        assert_eq!(ledger.total_amount(), Money::from_pence(1));
    }

    #[test]
    fn test_restore_ignores_stored_totals() {
        let mut stored = {
            let mut ledger = CartLedger::new();
            ledger.add_item(simple("sku-1", 500));
            ledger.add_item(simple("sku-1", 500));
            ledger.to_stored()
        };
        stored.total_amount = Money::from_pence(1);
        stored.total_quantity = 99;

        let ledger = CartLedger::from_stored(stored);
        assert_eq!(ledger.total_amount(), Money::gbp(10, 0));
        assert_eq!(ledger.total_quantity(), 2);
    }
}
