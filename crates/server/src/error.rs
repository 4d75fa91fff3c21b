//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as a JSON body
//! of the form `{"detail": ...}`: a message string for not-found,
//! unauthorized and internal errors, and a list of field errors for
//! validation failures. Server errors are captured to Sentry before the
//! response is built; their details never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use pet_store_core::{ErrorKind, FieldError, Loc, ValidationErrors};

use crate::store::StoreError;

/// Application-level error type for the pet store.
#[derive(Debug, Error)]
pub enum AppError {
    /// A store operation failed.
    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    /// The request body, query or path did not validate.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// No route matched the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path exists but not for this method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body. `detail` is a string or a list of field errors.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Detail<'a> {
    Message(&'a str),
    Fields(&'a [FieldError]),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: Detail<'a>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::PetNotFound(_)
                | StoreError::PetsNotFound(_)
                | StoreError::OrderNotFound(_)
                | StoreError::UserNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
                StoreError::UserIdTaken(_) => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Detail<'_> {
        match self {
            Self::Store(err) => Detail::Message(match err {
                StoreError::PetNotFound(_) => "Pet not found",
                StoreError::PetsNotFound(_) => "Pets not found",
                StoreError::OrderNotFound(_) => "Order not found",
                StoreError::UserNotFound(_) => "User not found",
                StoreError::InvalidCredentials(_) => "Invalid username or password",
                StoreError::UserIdTaken(_) => USER_ID_TAKEN,
                StoreError::Poisoned(_) => INTERNAL_MESSAGE,
            }),
            Self::Validation(errors) => Detail::Fields(errors.errors()),
            Self::NotFound(message) | Self::MethodNotAllowed(message) => {
                Detail::Message(message)
            }
            Self::Internal(_) => Detail::Message(INTERNAL_MESSAGE),
        }
    }
}

const INTERNAL_MESSAGE: &str = "Internal server error";
const USER_ID_TAKEN: &str = "User id already in use";

impl From<StoreError> for AppError {
    /// Conflicts caused by the submitted record are reported against the
    /// body field that caused them.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserIdTaken(_) => Self::Validation(ValidationErrors::from(
                FieldError::new(Loc::body().join("id"), ErrorKind::ValueError, USER_ID_TAKEN),
            )),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
