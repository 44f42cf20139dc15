//! Axum router — maps URL paths to handlers.

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    gate::require_token,
    handlers::{auth, health, weather},
    state::{AppState, SharedState},
};

/// Build the full router. `allowed_origin` is the presentation client's origin.
pub fn build_router(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    let shared: SharedState = Arc::new(state);

    let origin: HeaderValue = allowed_origin
        .parse()
        .with_context(|| format!("Invalid allowed origin: {allowed_origin}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let gated = Router::new()
        .route("/api/weather", get(weather::list_cities))
        .route_layer(middleware::from_fn_with_state(shared.clone(), require_token));

    let router = Router::new()
        .merge(gated)
        .route("/api/weather/debug/cache-status", get(weather::cache_status))
        .route("/api/health/status", get(health::status))
        .route("/api/auth/resend-verification", post(auth::resend_verification))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared);

    Ok(router)
}
