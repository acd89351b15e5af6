//! List-backed customer store.
//!
//! Keeps every record in a `Vec` behind a `tokio::sync::RwLock`; lookups
//! are linear scans. Intended for development and tests, where a real
//! database is more ceremony than value. The lock makes the store safe to
//! share across request handlers; no further coordination is promised.

use async_trait::async_trait;
use tokio::sync::RwLock;

use clientele_core::{CustomerId, Email};

use super::{CustomerStore, RepositoryError};
use crate::models::{Customer, NewCustomer};

struct Inner {
    customers: Vec<Customer>,
    next_id: i32,
}

/// In-memory [`CustomerStore`] implementation.
pub struct InMemoryCustomerStore {
    inner: RwLock<Inner>,
}

impl InMemoryCustomerStore {
    /// Create an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                customers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store pre-populated with the given records.
    ///
    /// Ids continue after the highest seeded id.
    #[must_use]
    pub fn seeded(customers: Vec<Customer>) -> Self {
        let next_id = customers
            .iter()
            .map(|c| c.id.as_i32())
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            inner: RwLock::new(Inner { customers, next_id }),
        }
    }
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn select_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.inner.read().await.customers.clone())
    }

    async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn select_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().find(|c| &c.email == email).cloned())
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.customers.iter().any(|c| c.email == customer.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = CustomerId::new(inner.next_id);
        inner.next_id = inner.next_id.saturating_add(1);

        let customer = Customer {
            id,
            name: customer.name,
            email: customer.email,
            password_hash: customer.password_hash,
            age: customer.age,
            gender: customer.gender,
        };
        inner.customers.push(customer.clone());

        Ok(customer)
    }

    async fn exists_with_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().any(|c| &c.email == email))
    }

    async fn exists_with_id(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().any(|c| c.id == id))
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        let position = inner
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        inner.customers.remove(position);

        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        let existing = inner
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = customer.clone();

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
