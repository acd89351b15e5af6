//! Bearer-token issuance and validation.
//!
//! Tokens are HS256 JWTs signed with the configured secret. The subject
//! claim carries the authenticated customer's email address.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use clientele_core::Email;

use super::AuthError;
use crate::config::JwtConfig;

/// Claims stored in an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated customer's email address.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
    /// Token issuer.
    pub iss: String,
}

/// Sign a token for the given customer email.
///
/// # Errors
///
/// Returns [`AuthError::TokenGeneration`] if signing fails.
pub fn issue_token(email: &Email, config: &JwtConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.expiration_minutes);

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        iss: config.issuer.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::TokenGeneration)
}

/// Validate a token and return its claims.
///
/// # Errors
///
/// Returns [`AuthError::TokenExpired`] for expired tokens and
/// [`AuthError::InvalidToken`] for every other validation failure
/// (bad signature, wrong issuer, malformed input).
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SecretString::from("a-test-secret-with-enough-length-0123456789"),
            expiration_minutes: 60,
            issuer: "clientele".to_owned(),
        }
    }

    fn email() -> Email {
        Email::parse("al@gmail.com").unwrap()
    }

    #[test]
    fn test_issued_token_verifies() {
        let config = config();

        let token = issue_token(&email(), &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "al@gmail.com");
        assert_eq!(claims.iss, "clientele");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(&email(), &config()).unwrap();

        let other = JwtConfig {
            secret: SecretString::from("a-different-secret-with-enough-length-98765"),
            ..config()
        };

        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let token = issue_token(&email(), &config()).unwrap();

        let other = JwtConfig {
            issuer: "someone-else".to_owned(),
            ..config()
        };

        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtConfig {
            expiration_minutes: -10,
            ..config()
        };

        let token = issue_token(&email(), &expired).unwrap();

        assert!(matches!(
            verify_token(&token, &config()),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            verify_token("not-a-jwt", &config()),
            Err(AuthError::InvalidToken)
        ));
    }
}
