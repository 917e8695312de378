pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_base_dir, load_config, resolve_config};
pub use wiring::{wire_dependencies, WiredApp, WiringError};
