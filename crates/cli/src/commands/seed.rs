//! Seed the database with randomized development customers.
//!
//! Each seeded customer gets a generated name, a matching gmail address,
//! an age between 16 and 98, and a throwaway UUID password (hashed like
//! any real registration would be).

use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;
use secrecy::SecretString;
use uuid::Uuid;

use clientele_core::{Email, Gender};
use clientele_server::db::{self, CustomerStore, PostgresCustomerStore};
use clientele_server::models::NewCustomer;
use clientele_server::services::auth::hash_password;

const FIRST_NAMES: &[&str] = &[
    "alex", "jamila", "ines", "marco", "tariq", "sofia", "bram", "yuki", "amara", "dmitri",
];

const LAST_NAMES: &[&str] = &[
    "okafor", "lindgren", "silva", "haddad", "kovacs", "tanaka", "moreau", "petrov", "ademi",
    "fontaine",
];

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] clientele_server::db::RepositoryError),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Generated email failed validation: {0}")]
    InvalidEmail(#[from] clientele_core::EmailError),
}

/// Insert `count` randomized customers into the configured database.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is unset, the database is
/// unreachable, or an insert fails (including an unlucky duplicate email
/// collision; rerun in that case).
pub async fn run(count: u32) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    let pool = db::create_pool(&database_url).await?;
    let store = Arc::new(PostgresCustomerStore::new(pool));

    for _ in 0..count {
        let customer = random_customer()?;
        let email = customer.email.clone();
        let inserted = store.insert(customer).await?;
        tracing::info!(id = %inserted.id, %email, "seeded customer");
    }

    tracing::info!(count, "Seeding complete!");
    Ok(())
}

fn random_customer() -> Result<NewCustomer, SeedError> {
    let mut rng = rand::rng();

    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("alex");
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("okafor");
    // Random suffix keeps repeated seed runs from colliding on email
    let suffix: u32 = rng.random_range(1..10_000);

    let email = Email::parse(&format!("{first}.{last}{suffix}@gmail.com"))?;
    let password_hash =
        hash_password(&Uuid::new_v4().to_string()).map_err(|_| SeedError::PasswordHash)?;

    let gender = if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };

    Ok(NewCustomer {
        name: format!("{first} {last}"),
        email,
        password_hash,
        age: rng.random_range(16..99),
        gender,
    })
}
