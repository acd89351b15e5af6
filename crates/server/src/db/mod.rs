//! Customer store abstraction and its two backends.
//!
//! The [`CustomerStore`] trait is the data-access contract consumed by the
//! service layer. Two implementations exist:
//!
//! - [`InMemoryCustomerStore`] - list-backed, for development and tests
//! - [`PostgresCustomerStore`] - `PostgreSQL` via sqlx
//!
//! The active backend is chosen once at process startup from
//! [`StoreBackend`](crate::config::StoreBackend) configuration and shared
//! as an `Arc<dyn CustomerStore>`; it is never selected per call.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are run explicitly:
//! ```bash
//! cargo run -p clientele-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use clientele_core::{CustomerId, Email};

use crate::models::{Customer, NewCustomer};

pub use memory::InMemoryCustomerStore;
pub use postgres::PostgresCustomerStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Data-access contract for customer records.
///
/// Both backends behave identically from the service layer's perspective;
/// `update` replaces the record with the matching id and reports
/// [`RepositoryError::NotFound`] when no such record exists.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers, in id order.
    async fn select_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// The customer with the given id, if any.
    async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// The customer with the given email, if any. Used by authentication.
    async fn select_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    /// Insert a new customer and return it with its store-assigned id.
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Whether any customer has the given email.
    async fn exists_with_email(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Whether a customer with the given id exists.
    async fn exists_with_id(&self, id: CustomerId) -> Result<bool, RepositoryError>;

    /// Delete the customer with the given id.
    async fn delete_by_id(&self, id: CustomerId) -> Result<(), RepositoryError>;

    /// Replace the stored record whose id matches `customer.id`.
    async fn update(&self, customer: &Customer) -> Result<(), RepositoryError>;

    /// Cheap connectivity probe for the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
