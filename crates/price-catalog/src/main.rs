//! Price Catalogue Dump
//!
//! Lists every Stripe price and writes it to a text file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plan_checkout::{StripeCheckoutProvider, StripeCredentials, catalog};

/// Dump the Stripe price catalogue
#[derive(Parser, Debug)]
#[command(name = "price-catalog", version, about, long_about = None)]
struct Cli {
    /// Output file
    #[arg(short, long, default_value = "prices.txt")]
    output: PathBuf,

    /// Also print the catalogue to stdout
    #[arg(long)]
    print: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let credentials = StripeCredentials::from_env().context("cannot query Stripe")?;
    let provider = StripeCheckoutProvider::new(&credentials);

    let entries = catalog::fetch_catalog(provider.inner()).await?;
    let text = catalog::render(&entries, chrono::Utc::now());

    tokio::fs::write(&cli.output, &text)
        .await
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if cli.print {
        print!("{text}");
    }

    tracing::info!(count = entries.len(), output = %cli.output.display(), "Price catalogue written");

    Ok(())
}
