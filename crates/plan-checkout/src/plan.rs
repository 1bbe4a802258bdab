//! Plan Tiers and Price Resolution
//!
//! Maps the plan codes sent by the pricing page to Stripe price IDs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CheckoutError, Result};

/// Subscription plan tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanTier {
    #[default]
    Starter,
    Standard,
    Agency,
}

impl PlanTier {
    pub const ALL: [Self; 3] = [Self::Starter, Self::Standard, Self::Agency];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "STARTER",
            Self::Standard => "STANDARD",
            Self::Agency => "AGENCY",
        }
    }

    /// Parse a plan code, ignoring case. Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "STARTER" => Some(Self::Starter),
            "STANDARD" => Some(Self::Standard),
            "AGENCY" => Some(Self::Agency),
            _ => None,
        }
    }

    /// Environment variable holding this tier's price ID
    pub const fn env_key(self) -> &'static str {
        match self {
            Self::Starter => "STRIPE_PRICE_STARTER",
            Self::Standard => "STRIPE_PRICE_STANDARD",
            Self::Agency => "STRIPE_PRICE_AGENCY",
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stripe price ID (never empty)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceId(String);

impl PriceId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(CheckoutError::Config("price ID must not be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PriceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of resolving a plan code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub tier: PlanTier,
    pub price_id: &'a PriceId,
    /// True when the code was unknown and the default tier was used
    pub fallback: bool,
}

/// Immutable plan → price table, built once at startup
#[derive(Clone, Debug)]
pub struct PriceTable {
    prices: HashMap<PlanTier, PriceId>,
}

impl PriceTable {
    /// Build a table with an entry for every tier.
    pub fn new(starter: PriceId, standard: PriceId, agency: PriceId) -> Self {
        let prices = HashMap::from([
            (PlanTier::Starter, starter),
            (PlanTier::Standard, standard),
            (PlanTier::Agency, agency),
        ]);
        Self { prices }
    }

    /// Build from a key lookup (`STRIPE_PRICE_*`). Every tier is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |tier: PlanTier| -> Result<PriceId> {
            let raw = lookup(tier.env_key())
                .ok_or_else(|| CheckoutError::Config(format!("{} not set", tier.env_key())))?;
            PriceId::new(raw)
                .map_err(|_| CheckoutError::Config(format!("{} is empty", tier.env_key())))
        };

        Ok(Self::new(
            load(PlanTier::Starter)?,
            load(PlanTier::Standard)?,
            load(PlanTier::Agency)?,
        ))
    }

    /// Price for a known tier
    pub fn price(&self, tier: PlanTier) -> &PriceId {
        // All tiers are inserted by `new`.
        &self.prices[&tier]
    }

    /// Resolve a raw plan code. Unknown codes fall back to STARTER.
    pub fn resolve(&self, code: &str) -> Resolution<'_> {
        match PlanTier::parse(code) {
            Some(tier) => Resolution {
                tier,
                price_id: self.price(tier),
                fallback: false,
            },
            None => {
                tracing::warn!(
                    plan_id = %code,
                    fallback = %PlanTier::default(),
                    "Unknown plan code, using default tier"
                );
                Resolution {
                    tier: PlanTier::default(),
                    price_id: self.price(PlanTier::default()),
                    fallback: true,
                }
            }
        }
    }
}
