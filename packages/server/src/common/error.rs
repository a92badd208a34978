use thiserror::Error;

use crate::domains::member::models::MemberStatus;

/// Error taxonomy for the membership registry.
///
/// Every user-visible failure maps to one of these kinds; the HTTP layer
/// turns them into status codes. Token failures are collapsed to a single
/// `InvalidToken` so callers cannot distinguish "expired" from "forged"
/// (the distinction is logged server-side).
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("member with email {0} already exists")]
    AlreadyExists(String),

    #[error("member not found: {0}")]
    NotFound(String),

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("cannot {attempted} member in status {current}")]
    InvalidTransition {
        current: MemberStatus,
        attempted: &'static str,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RegistryError {
    /// Stable machine-readable kind, used in responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::AlreadyExists(_) => "already_exists",
            RegistryError::NotFound(_) => "not_found",
            RegistryError::InvalidToken => "invalid_token",
            RegistryError::Forbidden(_) => "forbidden",
            RegistryError::InvalidTransition { .. } => "invalid_transition",
            RegistryError::Validation(_) => "validation_error",
            RegistryError::Internal(_) => "internal_error",
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_names_status_and_attempt() {
        let err = RegistryError::InvalidTransition {
            current: MemberStatus::Approved,
            attempted: "approve",
        };
        assert_eq!(err.to_string(), "cannot approve member in status APPROVED");
        assert_eq!(err.kind(), "invalid_transition");
    }

    #[test]
    fn test_token_errors_share_one_message() {
        assert_eq!(
            RegistryError::InvalidToken.to_string(),
            "invalid or expired token"
        );
    }
}
