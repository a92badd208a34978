//! Member status state machine.
//!
//! Every status mutation goes through a named transition with an explicit
//! precondition; callers never write a status directly. A failed
//! precondition is an `InvalidTransition` error naming the current status
//! and the attempted transition, never a silent no-op.
//!
//! ```text
//! UNVERIFIED --verify_registration--> PENDING --approve--> APPROVED
//! UNVERIFIED/PENDING --reject--> (deleted)
//! any --delete--> (deleted)
//! ```

use crate::common::error::RegistryError;
use crate::domains::member::models::MemberStatus;

/// Named lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// Email verified via registration magic link
    VerifyRegistration,
    /// Admin approval
    Approve,
    /// Admin rejection; the record is removed
    Reject,
    /// Admin deletion; allowed from any status
    Delete,
}

impl StatusTransition {
    pub fn name(&self) -> &'static str {
        match self {
            StatusTransition::VerifyRegistration => "verify",
            StatusTransition::Approve => "approve",
            StatusTransition::Reject => "reject",
            StatusTransition::Delete => "delete",
        }
    }
}

/// Result of a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Status changes to the contained value
    Become(MemberStatus),
    /// The member record is removed
    Remove,
}

/// Check a transition against the current status.
pub fn apply(
    current: MemberStatus,
    transition: StatusTransition,
) -> Result<StatusOutcome, RegistryError> {
    use MemberStatus::*;
    use StatusTransition::*;

    match (current, transition) {
        (Unverified, VerifyRegistration) => Ok(StatusOutcome::Become(Pending)),
        (Pending, Approve) => Ok(StatusOutcome::Become(Approved)),
        (Unverified | Pending, Reject) => Ok(StatusOutcome::Remove),
        (_, Delete) => Ok(StatusOutcome::Remove),
        _ => Err(RegistryError::InvalidTransition {
            current,
            attempted: transition.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MemberStatus::*;
    use StatusTransition::*;

    #[test]
    fn test_verify_only_from_unverified() {
        assert_eq!(
            apply(Unverified, VerifyRegistration).unwrap(),
            StatusOutcome::Become(Pending)
        );
        assert!(apply(Pending, VerifyRegistration).is_err());
        assert!(apply(Approved, VerifyRegistration).is_err());
    }

    #[test]
    fn test_approve_only_from_pending() {
        assert_eq!(
            apply(Pending, Approve).unwrap(),
            StatusOutcome::Become(Approved)
        );
        assert!(apply(Unverified, Approve).is_err());
        // Approving twice is a precondition failure, not a no-op
        assert!(apply(Approved, Approve).is_err());
    }

    #[test]
    fn test_reject_removes_unapproved_members() {
        assert_eq!(apply(Unverified, Reject).unwrap(), StatusOutcome::Remove);
        assert_eq!(apply(Pending, Reject).unwrap(), StatusOutcome::Remove);
        assert!(apply(Approved, Reject).is_err());
    }

    #[test]
    fn test_delete_allowed_from_any_status() {
        for status in [Unverified, Pending, Approved] {
            assert_eq!(apply(status, Delete).unwrap(), StatusOutcome::Remove);
        }
    }

    #[test]
    fn test_error_names_current_status_and_transition() {
        let err = apply(Approved, Approve).unwrap_err();
        match err {
            RegistryError::InvalidTransition { current, attempted } => {
                assert_eq!(current, Approved);
                assert_eq!(attempted, "approve");
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }
}
