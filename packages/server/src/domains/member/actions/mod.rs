//! Member domain actions - the registration/approval orchestration.
//!
//! Plain async functions over `ServerDeps`; each HTTP request runs exactly
//! one of these synchronously. Collaborator failures that must not abort
//! the surrounding mutation (email send, best-effort image upload) are
//! caught and logged here, not propagated.

pub mod approval;
pub mod profile_update;
pub mod queries;
pub mod register;
pub mod verify_email;

use uuid::Uuid;

use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::member::machines::StatusTransition;
use crate::domains::member::models::{Member, MemberStatus};
use crate::kernel::ServerDeps;

pub use approval::{approve_member, delete_member, reject_member};
pub use profile_update::{member_from_update_token, request_profile_update, update_profile};
pub use queries::{get_member, list_members};
pub use register::register_member;
pub use verify_email::verify_email;

/// An uploaded profile image, already read into memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Persist a checked status transition with compare-and-swap.
///
/// The machine has already validated the transition against a loaded
/// snapshot; the conditional write closes the gap between that check and
/// the commit. A lost race resolves to the error the loser would have
/// seen had it loaded the row a moment later.
pub(crate) async fn commit_transition(
    deps: &ServerDeps,
    id: Uuid,
    expected: MemberStatus,
    next: MemberStatus,
    transition: StatusTransition,
) -> RegistryResult<Member> {
    if let Some(member) = deps.repo.transition_status(id, expected, next).await? {
        return Ok(member);
    }

    // CAS failed: either the status moved underneath us or the record is gone
    match deps.repo.find_by_id(id).await? {
        Some(current) => Err(RegistryError::InvalidTransition {
            current: current.status,
            attempted: transition.name(),
        }),
        None => Err(RegistryError::NotFound(id.to_string())),
    }
}
