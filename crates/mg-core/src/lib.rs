//! # mg-core
//!
//! Core domain models and business logic for the magnet shop.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod builder;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod display;
pub mod errors;
pub mod ids;
pub mod money;
pub mod order;
pub mod ports;

// Re-export commonly used types at the crate root
pub use builder::{Confirmation, IncomingFile, PackageBuilder, ProcessedImage, StagedImage};
pub use cart::{CartLedger, CartLineItem, Finish, StoredCart};
pub use catalog::{find_package, Package, CATALOG};
pub use config::StoreConfig;
pub use display::{group_for_display, CheckoutSummary, DisplayItem};
pub use errors::{BuilderError, CheckoutError, FinalizeError};
pub use ids::{CheckoutAttemptId, LineItemId, StagedImageId};
pub use money::Money;
