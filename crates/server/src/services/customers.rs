//! Customer service: validation, uniqueness checks, and merge-on-update.
//!
//! This is the only layer with real branching logic. Routes stay thin and
//! the store stays dumb; everything that can reject a request lives here.

use std::sync::Arc;

use thiserror::Error;

use clientele_core::{CustomerId, Email};

use crate::db::{CustomerStore, RepositoryError};
use crate::models::{CustomerDto, CustomerRegistration, CustomerUpdate, NewCustomer};
use crate::services::auth;

/// Domain errors surfaced by the customer service.
///
/// All of these are caller-input problems; none are retried.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Requested customer id does not exist.
    #[error("customer with id [{0}] not found")]
    NotFound(CustomerId),

    /// Email already belongs to another customer.
    #[error("email already taken")]
    EmailTaken,

    /// Update request contains no actual change.
    #[error("no data changes found")]
    NoChanges,

    /// Malformed email in a request.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] clientele_core::EmailError),

    /// Password could not be hashed.
    #[error("password hashing error")]
    PasswordHash,

    /// Store failure, propagated unmodified.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Customer service over the configured store.
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    /// Create a new customer service.
    #[must_use]
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// All customers, projected through the DTO mapper.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn get_all(&self) -> Result<Vec<CustomerDto>, CustomerError> {
        let customers = self.store.select_all().await?;
        Ok(customers.iter().map(CustomerDto::from).collect())
    }

    /// The customer with the given id.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the id is unknown.
    pub async fn get(&self, id: CustomerId) -> Result<CustomerDto, CustomerError> {
        let customer = self
            .store
            .select_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        Ok(CustomerDto::from(&customer))
    }

    /// Register a new customer.
    ///
    /// The plaintext password is hashed before anything is stored. The
    /// store never sees an insert for an already-taken email.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::EmailTaken` if the email is already in use,
    /// `CustomerError::InvalidEmail` if it is malformed.
    pub async fn register(
        &self,
        request: CustomerRegistration,
    ) -> Result<CustomerDto, CustomerError> {
        let email = Email::parse(&request.email)?;

        if self.store.exists_with_email(&email).await? {
            return Err(CustomerError::EmailTaken);
        }

        let password_hash =
            auth::hash_password(&request.password).map_err(|_| CustomerError::PasswordHash)?;

        let customer = self
            .store
            .insert(NewCustomer {
                name: request.name,
                email,
                password_hash,
                age: request.age,
                gender: request.gender,
            })
            .await?;

        Ok(CustomerDto::from(&customer))
    }

    /// Delete the customer with the given id.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the id is unknown; the delete
    /// operation is not reached in that case.
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        if !self.store.exists_with_id(id).await? {
            return Err(CustomerError::NotFound(id));
        }

        self.store.delete_by_id(id).await?;
        Ok(())
    }

    /// Apply a partial update to the customer with the given id.
    ///
    /// Only fields that are present AND differ from the current value are
    /// staged; a request that stages nothing is rejected. A staged email
    /// change is checked for uniqueness before anything is persisted.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` for an unknown id,
    /// `CustomerError::EmailTaken` if the new email belongs to another
    /// record, and `CustomerError::NoChanges` if nothing would change.
    pub async fn update(
        &self,
        id: CustomerId,
        request: CustomerUpdate,
    ) -> Result<CustomerDto, CustomerError> {
        let mut customer = self
            .store
            .select_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut changed = false;

        if let Some(name) = request.name
            && name != customer.name
        {
            customer.name = name;
            changed = true;
        }

        if let Some(email) = request.email {
            let email = Email::parse(&email)?;
            if email != customer.email {
                if self.store.exists_with_email(&email).await? {
                    return Err(CustomerError::EmailTaken);
                }
                customer.email = email;
                changed = true;
            }
        }

        if let Some(age) = request.age
            && age != customer.age
        {
            customer.age = age;
            changed = true;
        }

        if !changed {
            return Err(CustomerError::NoChanges);
        }

        self.store.update(&customer).await?;

        Ok(CustomerDto::from(&customer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use clientele_core::Gender;

    use super::*;
    use crate::db::InMemoryCustomerStore;
    use crate::models::Customer;

    /// Store double that counts mutating calls, so tests can assert that
    /// rejected requests never reach persistence.
    struct RecordingStore {
        inner: InMemoryCustomerStore,
        inserts: AtomicUsize,
        updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryCustomerStore::new(),
                inserts: AtomicUsize::new(0),
                updates: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CustomerStore for RecordingStore {
        async fn select_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            self.inner.select_all().await
        }

        async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.inner.select_by_id(id).await
        }

        async fn select_by_email(
            &self,
            email: &Email,
        ) -> Result<Option<Customer>, RepositoryError> {
            self.inner.select_by_email(email).await
        }

        async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(customer).await
        }

        async fn exists_with_email(&self, email: &Email) -> Result<bool, RepositoryError> {
            self.inner.exists_with_email(email).await
        }

        async fn exists_with_id(&self, id: CustomerId) -> Result<bool, RepositoryError> {
            self.inner.exists_with_id(id).await
        }

        async fn delete_by_id(&self, id: CustomerId) -> Result<(), RepositoryError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }

        async fn update(&self, customer: &Customer) -> Result<(), RepositoryError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update(customer).await
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            self.inner.ping().await
        }
    }

    fn registration(name: &str, email: &str, age: i32) -> CustomerRegistration {
        CustomerRegistration {
            name: name.to_owned(),
            email: email.to_owned(),
            password: "password".to_owned(),
            age,
            gender: Gender::Male,
        }
    }

    async fn seeded_service() -> (Arc<RecordingStore>, CustomerService) {
        let store = Arc::new(RecordingStore::new());
        let service = CustomerService::new(Arc::clone(&store) as Arc<dyn CustomerStore>);

        service.register(registration("al", "al@gmail.com", 10)).await.unwrap();

        (store, service)
    }

    #[tokio::test]
    async fn test_get_all_maps_every_customer() {
        let (_, service) = seeded_service().await;
        service.register(registration("bo", "bo@gmail.com", 20)).await.unwrap();

        let all = service.get_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all.first().map(|c| c.name.as_str()), Some("al"));
    }

    #[tokio::test]
    async fn test_get_returns_dto() {
        let (_, service) = seeded_service().await;

        let dto = service.get(CustomerId::new(1)).await.unwrap();

        assert_eq!(dto.id, CustomerId::new(1));
        assert_eq!(dto.name, "al");
        assert_eq!(dto.email.as_str(), "al@gmail.com");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (_, service) = seeded_service().await;

        let err = service.get(CustomerId::new(42)).await.unwrap_err();

        assert_eq!(err.to_string(), "customer with id [42] not found");
    }

    #[tokio::test]
    async fn test_register_hashes_the_password() {
        let store = Arc::new(RecordingStore::new());
        let service = CustomerService::new(Arc::clone(&store) as Arc<dyn CustomerStore>);

        let dto = service.register(registration("al", "al@gmail.com", 39)).await.unwrap();

        assert_eq!(dto.name, "al");
        assert_eq!(dto.age, 39);

        let stored = store
            .select_by_email(&Email::parse("al@gmail.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "password");
        assert!(auth::verify_password("password", &stored.password_hash).is_ok());
    }

    #[tokio::test]
    async fn test_register_taken_email_never_inserts() {
        let (store, service) = seeded_service().await;

        let err = service
            .register(registration("al2", "al@gmail.com", 40))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::EmailTaken));
        assert_eq!(err.to_string(), "email already taken");
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, service) = seeded_service().await;

        service.delete(CustomerId::new(1)).await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
        assert!(matches!(
            service.get(CustomerId::new(1)).await,
            Err(CustomerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_never_reaches_the_store() {
        let (store, service) = seeded_service().await;

        let err = service.delete(CustomerId::new(10)).await.unwrap_err();

        assert_eq!(err.to_string(), "customer with id [10] not found");
        assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_all_properties() {
        let (_, service) = seeded_service().await;

        let dto = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    name: Some("alan".to_owned()),
                    email: Some("alan@gmail.com".to_owned()),
                    age: Some(40),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "alan");
        assert_eq!(dto.email.as_str(), "alan@gmail.com");
        assert_eq!(dto.age, 40);
    }

    #[tokio::test]
    async fn test_update_only_name() {
        let (_, service) = seeded_service().await;

        let dto = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    name: Some("alan".to_owned()),
                    ..CustomerUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "alan");
        assert_eq!(dto.email.as_str(), "al@gmail.com");
        assert_eq!(dto.age, 10);
    }

    #[tokio::test]
    async fn test_update_only_email() {
        let (_, service) = seeded_service().await;

        let dto = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    email: Some("alan@gmail.com".to_owned()),
                    ..CustomerUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "al");
        assert_eq!(dto.email.as_str(), "alan@gmail.com");
        assert_eq!(dto.age, 10);
    }

    #[tokio::test]
    async fn test_update_only_age() {
        let (_, service) = seeded_service().await;

        let dto = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    age: Some(20),
                    ..CustomerUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "al");
        assert_eq!(dto.email.as_str(), "al@gmail.com");
        assert_eq!(dto.age, 20);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_never_persists() {
        let (store, service) = seeded_service().await;
        service.register(registration("jamila", "jamila@gmail.com", 23)).await.unwrap();

        let result = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    email: Some("jamila@gmail.com".to_owned()),
                    ..CustomerUpdate::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CustomerError::EmailTaken)));
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_with_no_changes_is_rejected() {
        let (store, service) = seeded_service().await;

        // Every field present but equal to the current value.
        let err = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    name: Some("al".to_owned()),
                    email: Some("al@gmail.com".to_owned()),
                    age: Some(10),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "no data changes found");
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_, service) = seeded_service().await;

        let result = service
            .update(
                CustomerId::new(9),
                CustomerUpdate {
                    age: Some(20),
                    ..CustomerUpdate::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }

    /// The scenario from the development fixtures: alex and jamila.
    #[tokio::test]
    async fn test_alex_and_jamila_scenario() {
        let store = Arc::new(RecordingStore::new());
        let service = CustomerService::new(Arc::clone(&store) as Arc<dyn CustomerStore>);
        service.register(registration("alex", "alex@gmail.com", 28)).await.unwrap();
        service.register(registration("jamila", "jamila@gmail.com", 23)).await.unwrap();

        let result = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    email: Some("jamila@gmail.com".to_owned()),
                    ..CustomerUpdate::default()
                },
            )
            .await;
        assert_eq!(result.unwrap_err().to_string(), "email already taken");

        let dto = service
            .update(
                CustomerId::new(1),
                CustomerUpdate {
                    age: Some(30),
                    ..CustomerUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.id, CustomerId::new(1));
        assert_eq!(dto.name, "alex");
        assert_eq!(dto.email.as_str(), "alex@gmail.com");
        assert_eq!(dto.age, 30);
    }
}
