//! Profile image upload validation.
//!
//! Checks size, extension, declared MIME type, and the actual file header
//! (magic bytes) before anything touches storage. Images are optional
//! everywhere, so `None` is handled by callers; this module validates a
//! present upload.

use crate::common::error::RegistryError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Validate an uploaded profile image.
pub fn validate_profile_image(
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<(), RegistryError> {
    if bytes.is_empty() {
        return Err(RegistryError::Validation(
            "empty file not allowed".to_string(),
        ));
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(RegistryError::Validation(format!(
            "file size exceeds 5MB limit (got {} bytes)",
            bytes.len()
        )));
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(RegistryError::Validation(format!(
            "invalid file extension '.{}' (allowed: jpg, jpeg, png, webp, gif)",
            extension
        )));
    }

    if !ALLOWED_MIME_TYPES.contains(&content_type) {
        return Err(RegistryError::Validation(format!(
            "invalid content type '{}'",
            content_type
        )));
    }

    if !has_valid_image_header(bytes) {
        return Err(RegistryError::Validation(
            "file content does not match its extension or is corrupted".to_string(),
        ));
    }

    Ok(())
}

/// Magic-byte check for JPEG / PNG / GIF / WebP.
fn has_valid_image_header(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return true;
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return true;
    }

    // GIF: "GIF8"
    if bytes.starts_with(b"GIF8") {
        return true;
    }

    // WebP: "RIFF" .... "WEBP"
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return true;
    }

    false
}
