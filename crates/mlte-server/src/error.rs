//! API error type with HTTP status mapping.
//!
//! Error bodies have the shape
//! `{"success": false, "error": {"code", "message", "details"}}`. For 404 and
//! 409 `details` is `{"entity", "identifier"}`, which the remote store client
//! turns back into the exact `StoreError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mlte_store::{Entity, ErrorBody, ErrorDetails, ErrorEnvelope, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 404
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: Entity, identifier: String },

    /// 409
    #[error("{entity} already exists: {identifier}")]
    Conflict { entity: Entity, identifier: String },

    /// 400
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 500
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, details) = match self {
            ApiError::NotFound { entity, identifier } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                Some(ErrorDetails { entity, identifier }),
            ),
            ApiError::Conflict { entity, identifier } => (
                StatusCode::CONFLICT,
                "CONFLICT",
                Some(ErrorDetails { entity, identifier }),
            ),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::InternalError(_) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        };

        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, identifier } => {
                ApiError::NotFound { entity, identifier }
            }
            StoreError::AlreadyExists { entity, identifier } => {
                ApiError::Conflict { entity, identifier }
            }
            StoreError::Validation(err) => ApiError::BadRequest(err.to_string()),
            err @ (StoreError::Internal(_) | StoreError::InvalidUri { .. }) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<mlte_core::CoreError> for ApiError {
    fn from(err: mlte_core::CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("store task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::not_found(Entity::Model, "ns/m"), StatusCode::NOT_FOUND),
            (StoreError::already_exists(Entity::Namespace, "ns"), StatusCode::CONFLICT),
            (StoreError::internal("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn validation_is_bad_request() {
        let core = mlte_core::Context::new("", "m", "v").unwrap_err();
        let response = ApiError::from(StoreError::from(core)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
