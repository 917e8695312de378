//! Static package catalog.
//!
//! Five fixed tiers. Read-only input to the package builder.

use serde::Serialize;

use crate::money::Money;

/// Flat per-magnet baseline used to compute savings on package tiers.
pub const BASELINE_UNIT_PRICE: Money = Money::gbp(5, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub id: &'static str,
    pub name: &'static str,
    pub price: Money,
    pub price_per_unit: Money,
    pub max_files: usize,
    pub description: &'static str,
    pub tag: Option<&'static str>,
}

pub static CATALOG: [Package; 5] = [
    Package {
        id: "1",
        name: "Single Magnet",
        price: Money::gbp(5, 0),
        price_per_unit: Money::gbp(5, 0),
        max_files: 1,
        description: "One custom photo magnet",
        tag: None,
    },
    Package {
        id: "6",
        name: "6 Magnets",
        price: Money::gbp(17, 0),
        price_per_unit: Money::gbp(2, 83),
        max_files: 6,
        description: "Six custom photo magnets",
        tag: Some("Popular"),
    },
    Package {
        id: "9",
        name: "9 Magnets",
        price: Money::gbp(23, 0),
        price_per_unit: Money::gbp(2, 56),
        max_files: 9,
        description: "Nine custom photo magnets",
        tag: None,
    },
    Package {
        id: "12",
        name: "12 Magnets",
        price: Money::gbp(28, 0),
        price_per_unit: Money::gbp(2, 33),
        max_files: 12,
        description: "Twelve custom photo magnets",
        tag: Some("Best value"),
    },
    Package {
        id: "16",
        name: "16 Magnets",
        price: Money::gbp(34, 0),
        price_per_unit: Money::gbp(2, 13),
        max_files: 16,
        description: "Sixteen custom photo magnets",
        tag: Some("Biggest saving"),
    },
];

/// Looks up a tier by id.
pub fn find_package(id: &str) -> Option<&'static Package> {
    CATALOG.iter().find(|p| p.id == id)
}
