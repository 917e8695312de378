//! # magnetshop
//!
//! Process bootstrap for the magnet storefront: configuration loading,
//! tracing setup and dependency wiring on top of `mg-core`, `mg-app` and
//! `mg-infra`.

pub mod bootstrap;

pub use bootstrap::{resolve_config, wire_dependencies, WiredApp};
