//! Customer route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tracing::instrument;

use clientele_core::CustomerId;

use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::{CustomerDto, CustomerRegistration, CustomerUpdate};
use crate::services::{AuthService, CustomerService};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/customers", get(list).post(register))
        .route(
            "/api/v1/customers/{id}",
            get(get_by_id).put(update).delete(delete),
        )
}

/// List all customers.
#[instrument(skip(state))]
async fn list(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let service = CustomerService::new(state.store());
    let customers = service.get_all().await?;

    Ok(Json(customers))
}

/// Get a single customer by id.
#[instrument(skip(state))]
async fn get_by_id(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerDto>, ApiError> {
    let service = CustomerService::new(state.store());
    let customer = service.get(CustomerId::new(id)).await?;

    Ok(Json(customer))
}

/// Register a new customer.
///
/// Open endpoint: this is how accounts come to exist. The response carries
/// a freshly issued bearer token in the `Authorization` header so clients
/// can proceed without a separate login round-trip.
#[instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CustomerRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let service = CustomerService::new(state.store());
    let customer = service.register(request).await?;

    let auth = AuthService::new(state.store(), state.config().jwt().clone());
    let token = auth.issue_token(&customer.email)?;

    tracing::info!(customer_id = %customer.id, "customer registered");

    Ok((
        StatusCode::CREATED,
        [(header::AUTHORIZATION, format!("Bearer {token}"))],
        Json(customer),
    ))
}

/// Apply a partial update to a customer.
#[instrument(skip(state, request))]
async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<CustomerUpdate>,
) -> Result<Json<CustomerDto>, ApiError> {
    let service = CustomerService::new(state.store());
    let customer = service.update(CustomerId::new(id), request).await?;

    Ok(Json(customer))
}

/// Delete a customer by id.
#[instrument(skip(state))]
async fn delete(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let service = CustomerService::new(state.store());
    service.delete(CustomerId::new(id)).await?;

    tracing::info!(customer_id = id, "customer deleted");

    Ok(StatusCode::NO_CONTENT)
}
