//! Bearer-token access gate.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tracing::debug;

use crate::{handlers::ApiError, state::SharedState};

/// Lets the request through when no token is configured or the bearer token matches.
/// A missing, malformed or non-bearer `Authorization` header is a 401 when gated.
pub async fn require_token(
    State(state): State<SharedState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.api_token.as_deref() else {
        return next.run(request).await;
    };

    match bearer {
        Ok(TypedHeader(Authorization(token))) if token.token() == expected => {
            next.run(request).await
        }
        _ => {
            debug!(path = %request.uri().path(), "rejected request without valid bearer token");
            ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
