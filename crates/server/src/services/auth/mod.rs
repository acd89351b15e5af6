//! Authentication service.
//!
//! Verifies customer credentials against the store and issues bearer
//! tokens. Password hashing is argon2; token mechanics live in [`jwt`].

mod error;
pub mod jwt;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use clientele_core::Email;

use crate::config::JwtConfig;
use crate::db::CustomerStore;
use crate::models::{AuthenticationResponse, CustomerDto};

/// Authentication service.
pub struct AuthService {
    store: Arc<dyn CustomerStore>,
    jwt: JwtConfig,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(store: Arc<dyn CustomerStore>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    /// Authenticate with email and password.
    ///
    /// On success returns a signed bearer token together with the
    /// authenticated customer's projection. Unknown email and wrong
    /// password are deliberately indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password pair
    /// is wrong, `AuthError::InvalidEmail` if the email is malformed.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError> {
        let email = Email::parse(username)?;

        let customer = self
            .store
            .select_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &customer.password_hash)?;

        let token = jwt::issue_token(&customer.email, &self.jwt)?;

        Ok(AuthenticationResponse {
            token,
            customer: CustomerDto::from(&customer),
        })
    }

    /// Sign a bearer token for a freshly registered customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenGeneration` if signing fails.
    pub fn issue_token(&self, email: &Email) -> Result<String, AuthError> {
        jwt::issue_token(email, &self.jwt)
    }
}

/// Hash a password for storage (argon2, PHC string format).
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the stored hash is unparseable.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
