//! Integration tests for Clientele.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a server against the in-memory backend (no database needed)
//! STORE_BACKEND=memory JWT_SECRET=<a strong secret> \
//!     cargo run -p clientele-server
//!
//! # Run the suite against it
//! cargo test -p clientele-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP; `SERVER_BASE_URL`
//! overrides the default of `http://localhost:8080`.
//!
//! # Test Categories
//!
//! - `customers` - Registration and CRUD flows, error statuses
//! - `auth` - Login flow and bearer-token enforcement

/// Base URL for the server under test (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}
