//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check (in main)
//! GET  /health/ready              - Readiness check (in main)
//!
//! # Auth
//! POST /api/v1/auth/login         - Login, returns bearer token + DTO
//!
//! # Customers
//! GET    /api/v1/customers        - List all customers (auth)
//! POST   /api/v1/customers        - Register a customer (open)
//! GET    /api/v1/customers/{id}   - Customer by id (auth)
//! PUT    /api/v1/customers/{id}   - Partial update (auth)
//! DELETE /api/v1/customers/{id}   - Delete by id (auth)
//! ```

pub mod auth;
pub mod customers;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(customers::router())
        .merge(auth::router())
}
