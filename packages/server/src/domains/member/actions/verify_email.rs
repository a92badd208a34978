//! Email verification action: UNVERIFIED -> PENDING via registration token.

use tracing::{info, warn};

use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::auth::TokenPurpose;
use crate::domains::member::machines::{self, StatusOutcome, StatusTransition};
use crate::domains::member::models::Member;
use crate::kernel::ServerDeps;

use super::commit_transition;

/// Consume a registration magic-link token.
///
/// Verifies signature, expiry and purpose, then moves the member from
/// UNVERIFIED to PENDING. All token rejections surface as one
/// `InvalidToken`; the distinction is logged.
pub async fn verify_email(token: &str, deps: &ServerDeps) -> RegistryResult<Member> {
    let email = deps
        .magic_link
        .verify(token, TokenPurpose::Registration)
        .map_err(|reason| {
            warn!(reason = %reason, "Registration token rejected");
            RegistryError::InvalidToken
        })?;

    let member = deps
        .repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| RegistryError::NotFound(email.clone()))?;

    let transition = StatusTransition::VerifyRegistration;
    let next = match machines::apply(member.status, transition)? {
        StatusOutcome::Become(next) => next,
        StatusOutcome::Remove => unreachable!("verify_registration never removes"),
    };

    let member = commit_transition(deps, member.id, member.status, next, transition).await?;
    info!(member_id = %member.id, email = %email, "Email verified, status changed to PENDING");

    Ok(member)
}
