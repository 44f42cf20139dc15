//! HTTP surface for the city comfort service.

pub mod gate;
pub mod handlers;
pub mod router;
pub mod state;

use anyhow::Context;
use comfort_core::{Auth0Client, ComfortService, Config, IdentityProvider};
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;

/// Build the service graph from config and serve until the listener fails.
pub async fn serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let comfort = Arc::new(ComfortService::from_config(config)?);

    let mut state = AppState::new(comfort).with_api_token(config.server.api_token.clone());
    match config.auth0() {
        Some(auth0) => {
            let identity: Arc<dyn IdentityProvider> = Arc::new(Auth0Client::new(auth0.clone()));
            state = state.with_identity(identity);
        }
        None => warn!("Auth0 is not configured; verification emails are disabled"),
    }

    let app = router::build_router(state, &config.server.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
