//! Cart ledger: line items, quantities and derived totals.

mod ledger;
mod line_item;
mod stored;

pub use ledger::{CartLedger, CartSnapshot};
pub use line_item::{CartLineItem, Finish, LineItemKind, PackageDetails};
pub use stored::{StoredCart, StoredLineItem, PACKAGE_CUSTOM_DATA_TYPE};
