//! HTTP mapping for the error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::common::error::RegistryError;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::InvalidToken => StatusCode::UNAUTHORIZED,
            RegistryError::Forbidden(_) => StatusCode::FORBIDDEN,
            RegistryError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the logs
        let detail = match &self {
            RegistryError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::member::models::MemberStatus;

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                RegistryError::AlreadyExists("a@x.com".into()),
                StatusCode::CONFLICT,
            ),
            (RegistryError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (RegistryError::InvalidToken, StatusCode::UNAUTHORIZED),
            (
                RegistryError::Forbidden("nope".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                RegistryError::InvalidTransition {
                    current: MemberStatus::Approved,
                    attempted: "approve",
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RegistryError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                RegistryError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
