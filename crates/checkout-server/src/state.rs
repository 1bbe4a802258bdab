//! Application State

use std::sync::Arc;

use plan_checkout::CheckoutInitiator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout initiator (read-only price table + provider client)
    pub checkout: Arc<CheckoutInitiator>,
}
