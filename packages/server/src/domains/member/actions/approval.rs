//! Admin actions: approve, reject, delete.
//!
//! Every function takes an `AdminAuth` witness; the edge layer is the only
//! place one can be minted, so these cannot run unauthenticated.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::common::auth::AdminAuth;
use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::member::machines::{self, StatusOutcome, StatusTransition};
use crate::domains::member::models::{Member, MemberStatus};
use crate::kernel::ServerDeps;

use super::commit_transition;

/// Approve a PENDING member. Sends the approval notification; a send
/// failure is logged, the approval stands.
pub async fn approve_member(
    _admin: AdminAuth,
    member_id: Uuid,
    deps: &ServerDeps,
) -> RegistryResult<Member> {
    let member = find_member(member_id, deps).await?;

    let transition = StatusTransition::Approve;
    machines::apply(member.status, transition)?;

    let member = commit_transition(
        deps,
        member.id,
        MemberStatus::Pending,
        MemberStatus::Approved,
        transition,
    )
    .await?;

    if let Err(e) = deps.email.send_approval(&member.email, &member.name).await {
        error!(member_id = %member.id, error = %e, "Failed to send approval notification");
    }
    info!(member_id = %member.id, email = %member.email, "Member approved");

    Ok(member)
}

/// Reject an UNVERIFIED or PENDING member: the record is deleted.
/// No notification is sent on rejection.
pub async fn reject_member(
    _admin: AdminAuth,
    member_id: Uuid,
    deps: &ServerDeps,
) -> RegistryResult<()> {
    let member = find_member(member_id, deps).await?;

    match machines::apply(member.status, StatusTransition::Reject)? {
        StatusOutcome::Remove => {}
        StatusOutcome::Become(_) => unreachable!("reject always removes"),
    }

    deps.repo.delete(member.id).await?;
    info!(member_id = %member.id, email = %member.email, "Member rejected and deleted");

    Ok(())
}

/// Delete a member from any status. Managed profile images are removed
/// best-effort after the record is gone.
pub async fn delete_member(
    _admin: AdminAuth,
    member_id: Uuid,
    deps: &ServerDeps,
) -> RegistryResult<()> {
    let member = find_member(member_id, deps).await?;

    match machines::apply(member.status, StatusTransition::Delete)? {
        StatusOutcome::Remove => {}
        StatusOutcome::Become(_) => unreachable!("delete always removes"),
    }

    deps.repo.delete(member.id).await?;

    if let Some(image_url) = &member.image_url {
        if deps.storage.is_managed(image_url) {
            if let Err(e) = deps.storage.delete_image(image_url).await {
                warn!(member_id = %member.id, error = %e, "Failed to delete profile image");
            }
        }
    }

    info!(member_id = %member.id, email = %member.email, "Member deleted");
    Ok(())
}

async fn find_member(member_id: Uuid, deps: &ServerDeps) -> RegistryResult<Member> {
    deps.repo
        .find_by_id(member_id)
        .await?
        .ok_or_else(|| RegistryError::NotFound(member_id.to_string()))
}
