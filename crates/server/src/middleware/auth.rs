//! Bearer-token authentication extractor.
//!
//! Route handlers opt into authentication by taking a [`RequireAuth`]
//! parameter; requests without a valid token are rejected before the
//! handler body runs.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::auth::jwt::{self, Claims};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(claims): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
pub struct RequireAuth(pub Claims);

/// Rejection returned when a request carries no usable bearer token.
pub enum AuthRejection {
    /// No `Authorization: Bearer` header present.
    MissingToken,
    /// Token present but expired or otherwise invalid.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "missing bearer token",
            Self::InvalidToken => "invalid bearer token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": message, "status": 401 })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthRejection::MissingToken)?;

        let claims = jwt::verify_token(token, state.config().jwt())
            .map_err(|_| AuthRejection::InvalidToken)?;

        Ok(Self(claims))
    }
}
