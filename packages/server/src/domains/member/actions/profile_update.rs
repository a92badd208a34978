//! Self-service profile update via magic link.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::auth::{magic_link_url, TokenPurpose};
use crate::domains::member::guard;
use crate::domains::member::models::{Member, ProfileChanges};
use crate::kernel::file_validation::validate_profile_image;
use crate::kernel::ServerDeps;

use super::ImageUpload;

/// Email a profile-update magic link.
///
/// Issuance is not status-gated: a PENDING member gets a link too, but
/// consuming it fails the APPROVED check. Returns the link URL.
pub async fn request_profile_update(email: &str, deps: &ServerDeps) -> RegistryResult<String> {
    let member = deps
        .repo
        .find_by_email(email)
        .await?
        .ok_or_else(|| RegistryError::NotFound(email.to_string()))?;

    let token = deps
        .magic_link
        .issue(&member.email, TokenPurpose::ProfileUpdate)?;
    let link = magic_link_url(&deps.base_url, "/auth/verify-profile-update", &token);

    if let Err(e) = deps.email.send_magic_link(&member.email, &link).await {
        error!(email = %member.email, error = %e, "Failed to send profile-update magic link");
    }
    info!(email = %member.email, "Profile update requested");

    Ok(link)
}

/// Resolve a profile-update token to its member.
///
/// Applies the self-service status gate (APPROVED only) but no target
/// comparison — used by the verification endpoints so the frontend can
/// prefill the form before it knows what the user will change.
pub async fn member_from_update_token(token: &str, deps: &ServerDeps) -> RegistryResult<Member> {
    let email = deps
        .magic_link
        .verify(token, TokenPurpose::ProfileUpdate)
        .map_err(|reason| {
            warn!(reason = %reason, "Profile-update token rejected");
            RegistryError::InvalidToken
        })?;

    let member = deps
        .repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| RegistryError::NotFound(email.clone()))?;

    guard::ensure_self_service(&member)?;

    Ok(member)
}

/// Apply a profile update authorized by a magic-link token.
///
/// The token's identity is authoritative: it must resolve to the member
/// the URL targets (ownership guard), and that member must be APPROVED.
/// Unlike registration, an image upload failure here IS surfaced — the
/// caller explicitly asked for a replacement.
pub async fn update_profile(
    token: &str,
    target_id: Uuid,
    mut changes: ProfileChanges,
    image: Option<ImageUpload>,
    deps: &ServerDeps,
) -> RegistryResult<Member> {
    let member = member_from_update_token(token, deps).await?;
    guard::ensure_owner(&member, target_id)?;

    if changes.is_empty() && image.is_none() {
        return Err(RegistryError::Validation(
            "update carries no changes".to_string(),
        ));
    }

    if let Some(upload) = image {
        validate_profile_image(&upload.filename, &upload.content_type, &upload.bytes)?;

        let new_url = deps
            .storage
            .put_image(&upload.bytes, member.id, &upload.filename)
            .await
            .map_err(|e| {
                error!(member_id = %member.id, error = %e, "Profile image upload failed");
                RegistryError::Internal(e.context("profile image upload failed"))
            })?;

        // Old image goes away only after the replacement is safely stored
        if let Some(old_url) = &member.image_url {
            if deps.storage.is_managed(old_url) {
                if let Err(e) = deps.storage.delete_image(old_url).await {
                    warn!(member_id = %member.id, error = %e, "Failed to delete old profile image");
                }
            }
        }

        changes.image_url = Some(new_url);
    }

    let updated = deps.repo.update_profile(member.id, changes).await?;
    info!(member_id = %updated.id, email = %updated.email, "Member profile updated");

    Ok(updated)
}
