//! Mapping of service failures onto HTTP responses.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;
use crate::error::{ErrorKind, ServiceError};

/// An error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Body that could not be decoded into the request type.
    pub fn invalid_json(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }

    /// Convert a service failure. Store failures are logged and replaced by
    /// `internal_message` so database details never reach the client.
    pub fn from_service(err: ServiceError, internal_message: &str) -> Self {
        let status = status_for(err.kind);
        if err.kind == ErrorKind::Store {
            tracing::error!("{}: {}", internal_message, err.message);
            return Self::new(status, internal_message);
        }
        Self::new(status, err.message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service(err, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// HTTP status for each failure kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation
        | ErrorKind::InvalidBreed
        | ErrorKind::AssignmentAlreadyComplete
        | ErrorKind::CannotDeleteCompleted
        | ErrorKind::BusinessRule => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::RegistryUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extract a numeric path id, answering `invalid <what> id` otherwise.
pub fn path_id(path: Result<Path<i64>, PathRejection>, what: &str) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request(format!("invalid {} id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_by_kind() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::InvalidBreed), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::AssignmentAlreadyComplete),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::RegistryUnavailable),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn message_text_does_not_affect_status() {
        let err = ServiceError::business_rule("cat not found with id 3");
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_details_are_hidden() {
        let err = ServiceError::new(ErrorKind::Store, "database error: disk I/O error");
        let api = ApiError::from_service(err, "failed to get cats");
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "failed to get cats");
    }
}
