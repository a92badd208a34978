//! Register member action.

use tracing::{error, info, warn};

use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::auth::{magic_link_url, TokenPurpose};
use crate::domains::member::models::{Member, NewMember};
use crate::kernel::file_validation::validate_profile_image;
use crate::kernel::ServerDeps;

use super::ImageUpload;

/// Register a new member.
///
/// 1. Validates the profile fields and the optional image.
/// 2. Creates the member record in UNVERIFIED status.
/// 3. Uploads the image and attaches its URL — best effort: an upload
///    failure leaves the member without an image, it does not abort
///    registration (the image can be added later via profile update).
/// 4. Emails a registration magic link — also best effort; a send failure
///    is logged, never propagated.
pub async fn register_member(
    input: NewMember,
    image: Option<ImageUpload>,
    deps: &ServerDeps,
) -> RegistryResult<Member> {
    validate_registration(&input)?;

    if let Some(upload) = &image {
        validate_profile_image(&upload.filename, &upload.content_type, &upload.bytes)?;
    }

    if deps.repo.find_by_email(&input.email).await?.is_some() {
        return Err(RegistryError::AlreadyExists(input.email));
    }

    let email = input.email.clone();
    let mut member = deps.repo.create(input).await?;
    info!(member_id = %member.id, email = %email, "Member registered, status UNVERIFIED");

    if let Some(upload) = image {
        match deps
            .storage
            .put_image(&upload.bytes, member.id, &upload.filename)
            .await
        {
            Ok(url) => {
                member = deps.repo.set_image_url(member.id, Some(url)).await?;
            }
            Err(e) => {
                // Registration continues without the image
                warn!(member_id = %member.id, error = %e, "Profile image upload failed");
            }
        }
    }

    let token = deps.magic_link.issue(&email, TokenPurpose::Registration)?;
    let link = magic_link_url(&deps.base_url, "/auth/verify", &token);
    if let Err(e) = deps.email.send_magic_link(&email, &link).await {
        error!(email = %email, error = %e, "Failed to send registration magic link");
    }

    Ok(member)
}

fn validate_registration(input: &NewMember) -> RegistryResult<()> {
    if input.name.trim().is_empty() {
        return Err(RegistryError::Validation("name must not be empty".to_string()));
    }
    if input.generation <= 0 {
        return Err(RegistryError::Validation(
            "generation must be a positive cohort number".to_string(),
        ));
    }
    // Addressability is proven by the verification mail; this only rejects
    // obvious garbage.
    let email = input.email.trim();
    let valid_shape = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid_shape {
        return Err(RegistryError::Validation(format!(
            "not a valid email address: {}",
            email
        )));
    }
    Ok(())
}
