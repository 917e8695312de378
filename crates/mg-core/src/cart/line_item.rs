use serde::{Deserialize, Serialize};

use crate::catalog::Package;
use crate::ids::LineItemId;
use crate::money::Money;

/// Surface finish of a printed magnet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Gloss,
    Matte,
}

impl Finish {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Gloss => "gloss",
            Finish::Matte => "matte",
        }
    }

    /// Lenient parse: anything that is not `matte` is treated as gloss.
    pub fn parse_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("matte") {
            Finish::Matte
        } else {
            Finish::Gloss
        }
    }
}

/// Package metadata carried by a package line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDetails {
    pub package_id: String,
    pub package_name: String,
    pub size: usize,
    pub finish: Finish,
    pub image_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemKind {
    Simple,
    Package(PackageDetails),
}

/// One purchasable entry in the cart.
///
/// `total_price` always equals `price × quantity`; only the ledger mutates
/// quantities, through [`CartLineItem::set_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub id: LineItemId,
    pub name: String,
    pub price: Money,
    quantity: u32,
    total_price: Money,
    /// Final image URLs. Never raw image bytes for package items.
    pub images: Vec<String>,
    /// Small inline previews (`data:` URIs), one per image when available.
    pub previews: Vec<String>,
    pub kind: LineItemKind,
}

impl CartLineItem {
    pub fn simple(id: LineItemId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity: 1,
            total_price: price,
            images: Vec::new(),
            previews: Vec::new(),
            kind: LineItemKind::Simple,
        }
    }

    pub fn package(
        id: LineItemId,
        package: &Package,
        finish: Finish,
        image_urls: Vec<String>,
        previews: Vec<String>,
    ) -> Self {
        let details = PackageDetails {
            package_id: package.id.to_string(),
            package_name: package.name.to_string(),
            size: package.max_files,
            finish,
            image_count: image_urls.len(),
        };
        Self {
            id,
            name: format!("Custom {}", package.name),
            price: package.price,
            quantity: 1,
            total_price: package.price,
            images: image_urls,
            previews,
            kind: LineItemKind::Package(details),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, LineItemKind::Package(_))
    }

    pub fn package_details(&self) -> Option<&PackageDetails> {
        match &self.kind {
            LineItemKind::Package(details) => Some(details),
            LineItemKind::Simple => None,
        }
    }

    /// Number of physical magnets this entry represents.
    pub fn magnet_count(&self) -> u64 {
        let per_unit = match &self.kind {
            LineItemKind::Package(details) => details.size as u64,
            LineItemKind::Simple => 1,
        };
        per_unit * u64::from(self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = self.price.times(quantity);
    }
}
