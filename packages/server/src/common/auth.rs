//! Admin authorization for the management console endpoints.
//!
//! Admin frontends send a pre-shared key in the `X-Admin-Key` header. The
//! check happens once at the edge; core actions take the resulting
//! [`AdminAuth`] witness so an admin-only operation cannot be called
//! without it having run.

use sha2::{Digest, Sha256};

use crate::common::error::RegistryError;

/// Proof that the caller presented a valid admin credential.
///
/// Cannot be constructed outside [`AdminAuth::verify`].
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth {
    _priv: (),
}

impl AdminAuth {
    /// Compare the presented key against the configured one.
    ///
    /// Both sides are hashed first so the comparison time does not depend
    /// on where the strings diverge.
    pub fn verify(presented: &str, configured: &str) -> Result<AdminAuth, RegistryError> {
        let presented = Sha256::digest(presented.as_bytes());
        let configured = Sha256::digest(configured.as_bytes());

        if presented == configured {
            Ok(AdminAuth { _priv: () })
        } else {
            Err(RegistryError::Forbidden("invalid admin key".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_key_verifies() {
        assert!(AdminAuth::verify("hunter2", "hunter2").is_ok());
    }

    #[test]
    fn test_wrong_key_is_forbidden() {
        let err = AdminAuth::verify("hunter3", "hunter2").unwrap_err();
        assert!(matches!(err, RegistryError::Forbidden(_)));
    }

    #[test]
    fn test_empty_key_is_forbidden() {
        assert!(AdminAuth::verify("", "hunter2").is_err());
    }
}
