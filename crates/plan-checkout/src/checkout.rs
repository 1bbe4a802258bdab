//! Checkout Session Initiation
//!
//! Turns a `{ planId, email }` request into a hosted subscription checkout
//! session and hands back the redirect URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::plan::{PriceId, PriceTable};

/// Placeholder Stripe substitutes with the real session ID on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Metadata key carrying the plan code as sent by the caller
pub const PLAN_METADATA_KEY: &str = "plan_id";

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Plan code (case-insensitive)
    pub plan_id: String,

    /// Customer email, pre-filled on the checkout page. Not validated.
    pub email: String,
}

/// Checkout session mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Subscription,
}

/// Accepted payment method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    Card,
}

/// One priced line on the checkout page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price: PriceId,
    pub quantity: u64,
}

/// Everything the provider needs to create a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub payment_method_types: Vec<PaymentMethodType>,
    pub line_items: Vec<LineItem>,
    pub mode: SessionMode,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: String,
    pub metadata: HashMap<String, String>,
}

/// Session returned by the provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,

    /// URL to redirect the user to
    pub url: String,
}

/// Hosted checkout provider (Strategy pattern)
///
/// `StripeCheckoutProvider` in production, `MockCheckoutProvider` in tests.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create one hosted checkout session. Called exactly once per request.
    async fn create_session(&self, params: &SessionParams) -> Result<CheckoutSession>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}

/// Resolves plans to prices and asks the provider for a session
pub struct CheckoutInitiator {
    provider: Arc<dyn CheckoutProvider>,
    prices: PriceTable,
    base_url: String,
    timeout: Duration,
}

impl CheckoutInitiator {
    pub fn new(
        provider: Arc<dyn CheckoutProvider>,
        prices: PriceTable,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            prices,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(provider: Arc<dyn CheckoutProvider>, config: &CheckoutConfig) -> Self {
        Self::new(
            provider,
            config.prices.clone(),
            config.base_url.clone(),
            config.provider_timeout,
        )
    }

    pub const fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build session parameters for a request. Pure; no provider call.
    pub fn session_params(&self, request: &CheckoutRequest) -> SessionParams {
        let resolution = self.prices.resolve(&request.plan_id);
        let plan = urlencoding::encode(&request.plan_id);

        let success_url = format!(
            "{}/checkout/success?session_id={SESSION_ID_PLACEHOLDER}&plan={plan}",
            self.base_url
        );
        let cancel_url = format!("{}/pricing?plan={plan}", self.base_url);

        let mut metadata = HashMap::new();
        metadata.insert(PLAN_METADATA_KEY.to_string(), request.plan_id.clone());

        SessionParams {
            payment_method_types: vec![PaymentMethodType::Card],
            line_items: vec![LineItem {
                price: resolution.price_id.clone(),
                quantity: 1,
            }],
            mode: SessionMode::Subscription,
            success_url,
            cancel_url,
            customer_email: request.email.clone(),
            metadata,
        }
    }

    /// Create a checkout session. Single attempt; failures are returned as-is.
    pub async fn initiate(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let params = self.session_params(request);

        tracing::info!(
            plan_id = %request.plan_id,
            price_id = %params.line_items[0].price,
            provider = %self.provider.name(),
            "Creating checkout session"
        );

        let session = tokio::time::timeout(self.timeout, self.provider.create_session(&params))
            .await
            .map_err(|_| CheckoutError::Timeout(self.timeout.as_secs()))??;

        if session.url.is_empty() {
            return Err(CheckoutError::MissingUrl);
        }

        tracing::info!(session_id = %session.id, plan_id = %request.plan_id, "Checkout session created");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCheckoutProvider;

    fn table() -> PriceTable {
        PriceTable::new(
            PriceId::new("price_starter").unwrap(),
            PriceId::new("price_standard").unwrap(),
            PriceId::new("price_agency").unwrap(),
        )
    }

    fn initiator(provider: Arc<MockCheckoutProvider>) -> CheckoutInitiator {
        CheckoutInitiator::new(
            provider,
            table(),
            "https://app.example.com/",
            Duration::from_secs(5),
        )
    }

    fn request(plan_id: &str) -> CheckoutRequest {
        CheckoutRequest {
            plan_id: plan_id.into(),
            email: "a@b.com".into(),
        }
    }

    #[test]
    fn test_standard_plan_params() {
        let init = initiator(Arc::new(MockCheckoutProvider::new()));
        let params = init.session_params(&request("standard"));

        assert_eq!(params.line_items.len(), 1);
        assert_eq!(params.line_items[0].price.as_str(), "price_standard");
        assert_eq!(params.line_items[0].quantity, 1);
        assert_eq!(params.mode, SessionMode::Subscription);
        assert_eq!(params.payment_method_types, vec![PaymentMethodType::Card]);
        assert_eq!(params.customer_email, "a@b.com");
        assert_eq!(params.metadata.get("plan_id").map(String::as_str), Some("standard"));
        assert!(params.success_url.contains("plan=standard"));
        assert!(params.cancel_url.contains("plan=standard"));
    }

    #[test]
    fn test_redirect_urls() {
        let init = initiator(Arc::new(MockCheckoutProvider::new()));
        let params = init.session_params(&request("Agency"));

        assert_eq!(
            params.success_url,
            "https://app.example.com/checkout/success?session_id={CHECKOUT_SESSION_ID}&plan=Agency"
        );
        assert_eq!(params.cancel_url, "https://app.example.com/pricing?plan=Agency");
    }

    #[test]
    fn test_unknown_plan_keeps_original_code() {
        let init = initiator(Arc::new(MockCheckoutProvider::new()));
        let params = init.session_params(&request("unknown"));

        assert_eq!(params.line_items[0].price.as_str(), "price_starter");
        assert_eq!(params.metadata.get("plan_id").map(String::as_str), Some("unknown"));
        assert!(params.success_url.contains("plan=unknown"));
        assert!(params.cancel_url.contains("plan=unknown"));
    }

    #[test]
    fn test_plan_code_is_not_uppercased_in_urls() {
        let init = initiator(Arc::new(MockCheckoutProvider::new()));
        let params = init.session_params(&request("sTandard"));

        assert_eq!(params.line_items[0].price.as_str(), "price_standard");
        assert!(params.success_url.ends_with("plan=sTandard"));
        assert!(!params.success_url.contains("plan=STANDARD"));
    }

    #[test]
    fn test_plan_code_is_query_encoded() {
        let init = initiator(Arc::new(MockCheckoutProvider::new()));
        let params = init.session_params(&request("a b&c"));

        assert!(params.cancel_url.ends_with("plan=a%20b%26c"));
        assert_eq!(params.metadata["plan_id"], "a b&c");
    }

    #[tokio::test]
    async fn test_initiate_makes_one_call() {
        let provider = Arc::new(MockCheckoutProvider::new());
        let init = initiator(provider.clone());

        let session = init.initiate(&request("agency")).await.unwrap();

        assert!(session.url.starts_with("https://checkout.stripe.com/"));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].line_items[0].price.as_str(), "price_agency");
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_retried() {
        let provider = Arc::new(MockCheckoutProvider::failing("No such price: 'price_agency'"));
        let init = initiator(provider.clone());

        let err = init.initiate(&request("agency")).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Provider(_)));
        assert!(err.to_string().contains("No such price"));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_url_is_an_error() {
        let provider = Arc::new(MockCheckoutProvider::without_url());
        let init = initiator(provider);

        let err = init.initiate(&request("starter")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingUrl));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider = Arc::new(MockCheckoutProvider::with_delay(Duration::from_secs(60)));
        let init = initiator(provider);

        let err = init.initiate(&request("starter")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Timeout(5)));
    }
}
