use anyhow::Context;
use tracing::info;

use magnetshop::bootstrap::{self, tracing::init_tracing_subscriber};
use mg_core::CATALOG;

/// Restores the saved cart and prints its checkout summary as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let base_dir = bootstrap::default_base_dir()?;
    let config = bootstrap::resolve_config(base_dir).context("Failed to load configuration")?;
    init_tracing_subscriber(&config.log_dir)?;

    for package in CATALOG.iter() {
        info!(
            id = package.id,
            price = %package.price,
            per_magnet = %package.price_per_unit,
            "Package available"
        );
    }

    let app = bootstrap::wire_dependencies(&config)?;
    let mut cart = app.cart_session();
    cart.init().await;

    let summary = cart.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    cart.teardown().await;
    Ok(())
}
