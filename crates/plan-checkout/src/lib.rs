//! # plan-checkout
//!
//! Plan-to-price resolution and hosted subscription checkout.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  planId, email   ┌──────────────┐  session   ┌─────────────────┐
//! │  Pricing    │─────────────────▶│  Checkout    │───────────▶│  Stripe Hosted  │
//! │  page       │◀─────────────────│  Initiator   │◀───────────│  Checkout Page  │
//! └─────────────┘   redirect url   └──────────────┘    url     └─────────────────┘
//! ```
//!
//! The plan code is uppercased and looked up in a `PriceTable` loaded once at
//! startup. Unknown codes fall back to the STARTER tier with a warning. The
//! caller's original code travels in the redirect URLs and in session
//! metadata (`plan_id`) so the purchase can be reconciled later.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use plan_checkout::{CheckoutConfig, CheckoutInitiator, CheckoutRequest, StripeCheckoutProvider};
//!
//! let config = CheckoutConfig::from_env()?;
//! let provider = Arc::new(StripeCheckoutProvider::new(&config.credentials));
//! let initiator = CheckoutInitiator::from_config(provider, &config);
//!
//! let session = initiator.initiate(&CheckoutRequest {
//!     plan_id: "standard".into(),
//!     email: "user@example.com".into(),
//! }).await?;
//!
//! // Redirect user to: session.url
//! ```

pub mod catalog;
mod checkout;
mod config;
mod error;
mod mock;
mod plan;
mod stripe_provider;

pub use checkout::{
    CheckoutInitiator, CheckoutProvider, CheckoutRequest, CheckoutSession, LineItem,
    PLAN_METADATA_KEY, PaymentMethodType, SESSION_ID_PLACEHOLDER, SessionMode, SessionParams,
};
pub use config::{CheckoutConfig, StripeCredentials};
pub use error::{CheckoutError, Result};
pub use mock::MockCheckoutProvider;
pub use plan::{PlanTier, PriceId, PriceTable, Resolution};
pub use stripe_provider::StripeCheckoutProvider;
