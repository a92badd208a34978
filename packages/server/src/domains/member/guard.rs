//! Ownership guard for self-service profile mutations.
//!
//! The member id in the request path is advisory; the identity bound to
//! the verified token is authoritative. A valid token for member A used
//! against target id B must fail closed, whether or not B exists.

use uuid::Uuid;

use crate::common::error::RegistryError;
use crate::domains::member::models::{Member, MemberStatus};

/// Require that the token's resolved member is the one the request targets.
pub fn ensure_owner(token_member: &Member, target_id: Uuid) -> Result<(), RegistryError> {
    if token_member.id != target_id {
        return Err(RegistryError::Forbidden(
            "you can only update your own profile".to_string(),
        ));
    }
    Ok(())
}

/// Require APPROVED status for self-service edits. Unverified and pending
/// members go through the admin or complete verification first.
pub fn ensure_self_service(member: &Member) -> Result<(), RegistryError> {
    if member.status != MemberStatus::Approved {
        return Err(RegistryError::Forbidden(format!(
            "only approved members can update their profile (current status: {})",
            member.status
        )));
    }
    Ok(())
}
