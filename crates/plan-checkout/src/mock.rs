//! Mock Checkout Provider
//!
//! For tests and local demos. Records every call and returns canned sessions.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::checkout::{CheckoutProvider, CheckoutSession, SessionParams};
use crate::error::{CheckoutError, Result};

#[derive(Clone, Debug)]
enum Behavior {
    Succeed,
    Fail(String),
    NoUrl,
    Delay(Duration),
}

/// Mock provider recording the parameters it was called with
pub struct MockCheckoutProvider {
    behavior: Behavior,
    calls: Mutex<Vec<SessionParams>>,
}

impl Default for MockCheckoutProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCheckoutProvider {
    /// Always succeeds
    pub const fn new() -> Self {
        Self::with_behavior(Behavior::Succeed)
    }

    /// Always fails with a provider error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// Returns a session with an empty redirect URL
    pub const fn without_url() -> Self {
        Self::with_behavior(Behavior::NoUrl)
    }

    /// Succeeds after sleeping for `delay`
    pub const fn with_delay(delay: Duration) -> Self {
        Self::with_behavior(Behavior::Delay(delay))
    }

    const fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parameters of every call so far, oldest first
    pub fn calls(&self) -> Vec<SessionParams> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn session(n: usize) -> CheckoutSession {
        let id = format!("cs_test_{n:04}");
        CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{id}"),
            id,
        }
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    async fn create_session(&self, params: &SessionParams) -> Result<CheckoutSession> {
        let n = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            calls.push(params.clone());
            calls.len()
        };

        match &self.behavior {
            Behavior::Succeed => Ok(Self::session(n)),
            Behavior::Fail(message) => Err(CheckoutError::Provider(message.clone())),
            Behavior::NoUrl => Ok(CheckoutSession {
                url: String::new(),
                ..Self::session(n)
            }),
            Behavior::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::session(n))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
