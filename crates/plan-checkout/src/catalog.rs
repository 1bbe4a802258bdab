//! Price Catalogue
//!
//! Reads every price from Stripe and renders a plain-text listing, used by
//! operators to copy price IDs into `STRIPE_PRICE_*`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe::{Client, ListPrices, Price};

use crate::error::{CheckoutError, Result};

const PAGE_SIZE: u64 = 100;

/// One price as listed in the catalogue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub price_id: String,
    pub product_id: Option<String>,
    pub nickname: Option<String>,
    /// Amount in the currency's minor unit
    pub unit_amount: Option<i64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub interval_count: Option<u64>,
}

impl From<&Price> for CatalogEntry {
    fn from(price: &Price) -> Self {
        Self {
            price_id: price.id.to_string(),
            product_id: price.product.as_ref().map(|p| p.id().to_string()),
            nickname: price.nickname.clone(),
            unit_amount: price.unit_amount,
            currency: price.currency.as_ref().map(ToString::to_string),
            interval: price.recurring.as_ref().map(|r| r.interval.as_str().to_string()),
            interval_count: price.recurring.as_ref().map(|r| r.interval_count),
        }
    }
}

impl CatalogEntry {
    /// Tab-separated line: price, product, nickname, amount, currency, billing
    pub fn line(&self) -> String {
        let amount = self
            .unit_amount
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        let billing = match (&self.interval, self.interval_count) {
            (Some(interval), Some(1) | None) => format!("every {interval}"),
            (Some(interval), Some(n)) => format!("every {n} {interval}s"),
            (None, _) => "one-time".to_string(),
        };

        [
            self.price_id.as_str(),
            self.product_id.as_deref().unwrap_or("-"),
            self.nickname.as_deref().unwrap_or("-"),
            amount.as_str(),
            self.currency.as_deref().unwrap_or("-"),
            billing.as_str(),
        ]
        .join("\t")
    }
}

/// Fetch all prices, following pagination
pub async fn fetch_catalog(client: &Client) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    let mut params = ListPrices::new();
    params.limit = Some(PAGE_SIZE);

    loop {
        let page = Price::list(client, &params)
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        tracing::debug!(count = page.data.len(), "Fetched price page");
        entries.extend(page.data.iter().map(CatalogEntry::from));

        match page.data.last() {
            Some(last) if page.has_more => params.starting_after = Some(last.id.clone()),
            _ => break,
        }
    }

    Ok(entries)
}

/// Render the catalogue file contents
pub fn render(entries: &[CatalogEntry], generated_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "# Stripe price catalogue\n# generated at {}\n# {} prices\n",
        generated_at.to_rfc3339(),
        entries.len()
    );
    out.push_str("# price\tproduct\tnickname\tamount\tcurrency\tbilling\n");
    for entry in entries {
        out.push_str(&entry.line());
        out.push('\n');
    }
    out
}
