//! Configuration
//!
//! Central credential and price loading shared by every binary. All checks
//! run once at startup; a missing value fails before any request is made.

use std::time::Duration;

use crate::error::{CheckoutError, Result};
use crate::plan::PriceTable;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Stripe secret API key
#[derive(Clone)]
pub struct StripeCredentials {
    secret_key: String,
}

impl StripeCredentials {
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        let secret_key = secret_key.into().trim().to_string();
        if secret_key.is_empty() {
            return Err(CheckoutError::Config("STRIPE_SECRET_KEY is empty".into()));
        }
        Ok(Self { secret_key })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("STRIPE_SECRET_KEY")
            .ok_or_else(|| CheckoutError::Config("STRIPE_SECRET_KEY not set".into()))?;
        Self::new(key)
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl std::fmt::Debug for StripeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCredentials")
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

/// Checkout service configuration
#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub credentials: StripeCredentials,

    /// Plan → price mapping
    pub prices: PriceTable,

    /// Public site URL used for success/cancel redirects (no trailing slash)
    pub base_url: String,

    /// Upper bound on the Stripe session-creation call
    pub provider_timeout: Duration,
}

impl CheckoutConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = StripeCredentials::from_lookup(&lookup)?;
        let prices = PriceTable::from_lookup(&lookup)?;

        let base_url = lookup("APP_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CheckoutError::Config(format!(
                "APP_BASE_URL '{base_url}' must start with http:// or https://"
            )));
        }

        let timeout_secs = match lookup("CHECKOUT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                CheckoutError::Config(format!("CHECKOUT_TIMEOUT_SECS '{raw}' is invalid: {e}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(CheckoutError::Config(
                "CHECKOUT_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        Ok(Self {
            credentials,
            prices,
            base_url,
            provider_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(extra: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        let mut vars = HashMap::from([
            ("STRIPE_SECRET_KEY", "sk_test_fake"),
            ("STRIPE_PRICE_STARTER", "price_starter"),
            ("STRIPE_PRICE_STANDARD", "price_standard"),
            ("STRIPE_PRICE_AGENCY", "price_agency"),
        ]);
        vars.extend(extra.iter().copied());
        vars
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<CheckoutConfig> {
        CheckoutConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&vars(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
        assert_eq!(config.credentials.secret_key(), "sk_test_fake");
    }

    #[test]
    fn test_missing_secret_key_fails() {
        let mut vars = vars(&[]);
        vars.remove("STRIPE_SECRET_KEY");
        let err = load(&vars).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("STRIPE_SECRET_KEY not set"));
    }

    #[test]
    fn test_blank_secret_key_fails() {
        let err = load(&vars(&[("STRIPE_SECRET_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("STRIPE_SECRET_KEY is empty"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = load(&vars(&[("APP_BASE_URL", "https://app.example.com/")])).unwrap();
        assert_eq!(config.base_url, "https://app.example.com");
    }

    #[test]
    fn test_base_url_requires_scheme() {
        assert!(load(&vars(&[("APP_BASE_URL", "app.example.com")])).is_err());
    }

    #[test]
    fn test_timeout_parsing() {
        let config = load(&vars(&[("CHECKOUT_TIMEOUT_SECS", "5")])).unwrap();
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert!(load(&vars(&[("CHECKOUT_TIMEOUT_SECS", "0")])).is_err());
        assert!(load(&vars(&[("CHECKOUT_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = StripeCredentials::new("sk_live_secret").unwrap();
        assert!(!format!("{creds:?}").contains("sk_live_secret"));
    }
}
