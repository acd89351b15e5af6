//! Authentication route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::LoginRequest;
use crate::services::AuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/auth/login", post(login))
}

/// Authenticate a customer.
///
/// Returns the token both in the body and in the `Authorization` header;
/// browser clients read the header, everything else the body.
#[instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = AuthService::new(state.store(), state.config().jwt().clone());
    let response = auth.login(&request.username, &request.password).await?;

    Ok((
        [(
            header::AUTHORIZATION,
            format!("Bearer {}", response.token),
        )],
        Json(response),
    ))
}
