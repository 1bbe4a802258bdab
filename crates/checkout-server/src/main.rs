//! plan-checkout HTTP Server
//!
//! Axum-based server exposing checkout session creation for the pricing page.

mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plan_checkout::{CheckoutConfig, CheckoutInitiator, PlanTier, StripeCheckoutProvider};

use crate::routes::{CHECKOUT_PATH, router};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Credentials and prices are checked once, here
    let config = CheckoutConfig::from_env().context("failed to load checkout configuration")?;

    for tier in PlanTier::ALL {
        tracing::info!(plan = %tier, price_id = %config.prices.price(tier), "Price configured");
    }

    let provider = Arc::new(StripeCheckoutProvider::new(&config.credentials));
    let state = AppState {
        checkout: Arc::new(CheckoutInitiator::from_config(provider, &config)),
    };

    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, base_url = %config.base_url, "checkout server listening");
    tracing::info!("  GET  /health");
    tracing::info!("  POST {CHECKOUT_PATH}");

    axum::serve(listener, app).await?;

    Ok(())
}
