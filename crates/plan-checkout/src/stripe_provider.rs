//! Stripe Checkout Integration
//!
//! Implements `CheckoutProvider` on top of Stripe's hosted checkout.

use async_trait::async_trait;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionPaymentMethodTypes,
};

use crate::checkout::{
    CheckoutProvider, CheckoutSession, PaymentMethodType, SessionMode, SessionParams,
};
use crate::config::StripeCredentials;
use crate::error::{CheckoutError, Result};

/// Stripe client wrapper
#[derive(Clone)]
pub struct StripeCheckoutProvider {
    client: Client,
}

impl StripeCheckoutProvider {
    pub fn new(credentials: &StripeCredentials) -> Self {
        Self {
            client: Client::new(credentials.secret_key()),
        }
    }

    /// Get the underlying Stripe client
    pub const fn inner(&self) -> &Client {
        &self.client
    }
}

const fn stripe_mode(mode: SessionMode) -> CheckoutSessionMode {
    match mode {
        SessionMode::Subscription => CheckoutSessionMode::Subscription,
    }
}

const fn stripe_payment_method(kind: PaymentMethodType) -> CreateCheckoutSessionPaymentMethodTypes {
    match kind {
        PaymentMethodType::Card => CreateCheckoutSessionPaymentMethodTypes::Card,
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    async fn create_session(&self, params: &SessionParams) -> Result<CheckoutSession> {
        let mut create = CreateCheckoutSession::new();
        create.payment_method_types = Some(
            params
                .payment_method_types
                .iter()
                .copied()
                .map(stripe_payment_method)
                .collect(),
        );
        create.mode = Some(stripe_mode(params.mode));
        create.success_url = Some(&params.success_url);
        create.cancel_url = Some(&params.cancel_url);
        create.customer_email = Some(&params.customer_email);
        create.metadata = Some(params.metadata.clone());
        create.line_items = Some(
            params
                .line_items
                .iter()
                .map(|item| CreateCheckoutSessionLineItems {
                    price: Some(item.price.as_str().to_string()),
                    quantity: Some(item.quantity),
                    ..Default::default()
                })
                .collect(),
        );

        let session = StripeCheckoutSession::create(&self.client, create)
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        let url = session.url.ok_or(CheckoutError::MissingUrl)?;

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}
