//! Magic-link verification endpoints.
//!
//! Tokens arrive as an opaque `?token=` query parameter from emailed
//! links. Browser-facing endpoints answer with a 303 redirect to the
//! companion frontend; the redirect target is caller-supplied and goes
//! through the origin allow-list first.

use axum::{
    extract::{Extension, Query},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::error::RegistryError;
use crate::domains::member::actions;
use crate::domains::member::models::Member;
use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct VerifyParams {
    pub token: String,
    pub redirect: Option<String>,
}

#[derive(Deserialize)]
pub struct TokenParams {
    pub token: String,
}

/// Append a query pair to an already-validated redirect target.
fn with_query(target: &str, key: &str, value: &str) -> String {
    match url::Url::parse(target) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(key, value);
            url.to_string()
        }
        // Validated targets always parse; keep the target usable if not
        Err(_) => target.to_string(),
    }
}

/// POST /auth/magic-link/profile-update
pub async fn request_profile_update_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<MessageResponse>, RegistryError> {
    actions::request_profile_update(&request.email, &state.deps).await?;
    Ok(Json(MessageResponse {
        message: "Magic link sent to your email".to_string(),
    }))
}

/// GET /auth/verify?token=...&redirect=...
///
/// Consumes a registration token (UNVERIFIED -> PENDING), then bounces
/// the browser to the frontend with `verified=true&email=...` appended.
pub async fn verify_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Redirect, RegistryError> {
    let member = actions::verify_email(&params.token, &state.deps).await?;

    let target = state
        .deps
        .redirects
        .sanitize(params.redirect.as_deref().unwrap_or_default());
    let target = with_query(&target, "verified", "true");
    let target = with_query(&target, "email", &member.email);

    Ok(Redirect::to(&target))
}

/// GET /auth/verify-profile-update?token=...&redirect=...
///
/// Validates a profile-update token and forwards the browser to the
/// frontend's edit form, token attached as a query parameter.
pub async fn verify_profile_update_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Redirect, RegistryError> {
    actions::member_from_update_token(&params.token, &state.deps).await?;

    let target = state
        .deps
        .redirects
        .sanitize(params.redirect.as_deref().unwrap_or_default());
    let target = with_query(&target, "token", &params.token);

    Ok(Redirect::to(&target))
}

/// GET /auth/verify-profile-update-json?token=...
///
/// Same validation, but returns the member as JSON so the frontend can
/// prefill its form.
pub async fn verify_profile_update_json_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<Member>, RegistryError> {
    let member = actions::member_from_update_token(&params.token, &state.deps).await?;
    Ok(Json(member))
}
