//! # mg-app
//!
//! Application layer for the magnet shop: the cart session and the use
//! cases that move images from the package builder into the cart and the
//! cart into an order.

pub mod cart_session;
pub mod deps;
pub mod usecases;

pub use cart_session::CartSession;
pub use deps::AppDeps;
pub use usecases::{
    CheckoutDetails, FinalizePackageForCart, FinalizedPackage, SubmitCheckout, SubmitCroppedImage,
    UploadPolicy, UseCases,
};
