//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;

use plan_checkout::{CheckoutError, CheckoutRequest};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.checkout.provider_name().to_string(),
    })
}

/// Create a hosted checkout session for `{ planId, email }`
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, CheckoutError> {
    let Json(request) =
        payload.map_err(|rejection| CheckoutError::InvalidRequest(rejection.body_text()))?;

    let session = state.checkout.initiate(&request).await?;

    Ok(Json(CheckoutResponse { url: session.url }))
}
