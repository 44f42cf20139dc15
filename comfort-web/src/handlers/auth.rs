use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use super::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn resend_verification(
    State(state): State<SharedState>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }

    let identity = state.identity.as_ref().ok_or_else(|| {
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Identity provider is not configured")
    })?;

    match identity.resend_verification(email).await {
        Ok(true) => Ok(Json(json!({ "message": "Verification email sent successfully" }))),
        Ok(false) => Err(ApiError::bad_request(
            "Failed to send verification email. User may not exist.",
        )),
        Err(err) => {
            error!(email, error = %err, "error resending verification email");
            Err(ApiError::internal())
        }
    }
}
