//! Shared application state for the web server.

use comfort_core::{ComfortService, IdentityProvider};
use std::sync::Arc;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub comfort: Arc<ComfortService>,
    /// Absent when no identity provider is configured.
    pub identity: Option<Arc<dyn IdentityProvider>>,
    /// Bearer token required for the ranked list, if any.
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(comfort: Arc<ComfortService>) -> Self {
        Self { comfort, identity: None, api_token: None }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }
}

pub type SharedState = Arc<AppState>;
