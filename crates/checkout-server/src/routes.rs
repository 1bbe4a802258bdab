//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{create_checkout_session, health_check};
use crate::state::AppState;

pub const CHECKOUT_PATH: &str = "/api/create-checkout-session";

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(CHECKOUT_PATH, post(create_checkout_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
