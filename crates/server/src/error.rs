//! Unified error handling for the API surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::customers::CustomerError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Customer service rejection or failure.
    #[error(transparent)]
    Customer(#[from] CustomerError),

    /// Authentication rejection or failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store failure outside any service.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Customer(err) => match err {
                CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
                CustomerError::EmailTaken => StatusCode::CONFLICT,
                CustomerError::NoChanges | CustomerError::InvalidEmail(_) => {
                    StatusCode::BAD_REQUEST
                }
                CustomerError::PasswordHash | CustomerError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::TokenExpired
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::TokenGeneration
                | AuthError::PasswordHash
                | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-class errors are reported; their details stay out of the body
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let message = if status.is_server_error() {
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clientele_core::CustomerId;

    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::Customer(CustomerError::NotFound(CustomerId::new(3)));
        assert_eq!(err.to_string(), "customer with id [3] not found");

        let err = ApiError::Customer(CustomerError::EmailTaken);
        assert_eq!(err.to_string(), "email already taken");

        let err = ApiError::Customer(CustomerError::NoChanges);
        assert_eq!(err.to_string(), "no data changes found");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            get_status(ApiError::Customer(CustomerError::NotFound(CustomerId::new(1)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Customer(CustomerError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::Customer(CustomerError::NoChanges)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response =
            ApiError::Database(RepositoryError::DataCorruption("bad row".to_owned()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
