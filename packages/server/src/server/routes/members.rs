//! Member endpoints: registration, queries, self-service update, and the
//! admin console operations.
//!
//! Registration and update are multipart: a `profile` part carrying a
//! typed JSON document (skills/links as structured lists) and an optional
//! `image` file part.

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::common::auth::AdminAuth;
use crate::common::error::RegistryError;
use crate::domains::member::actions::{self, ImageUpload};
use crate::domains::member::models::{
    LinkInput, Member, MemberRank, MemberStatus, NewMember, ProfileChanges, SkillInput,
};
use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub generation: i32,
    pub rank: MemberRank,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillInput>,
    #[serde(default)]
    pub links: Vec<LinkInput>,
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<SkillInput>>,
    #[serde(default)]
    pub links: Option<Vec<LinkInput>>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<MemberStatus>,
}

#[derive(Deserialize)]
pub struct UpdateParams {
    pub token: String,
}

/// Pull the `profile` JSON part and optional `image` file part out of a
/// multipart body.
async fn read_profile_multipart(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<ImageUpload>), RegistryError> {
    let mut profile = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RegistryError::Validation(format!("invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("profile") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RegistryError::Validation(format!("invalid profile part: {}", e)))?;
                profile = Some(text);
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("profile.jpg").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RegistryError::Validation(format!("invalid image part: {}", e)))?;
                image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok((profile, image))
}

fn parse_profile<T: serde::de::DeserializeOwned>(json: Option<String>) -> Result<T, RegistryError> {
    let json = json.ok_or_else(|| {
        RegistryError::Validation("missing 'profile' part in multipart body".to_string())
    })?;
    serde_json::from_str(&json)
        .map_err(|e| RegistryError::Validation(format!("invalid profile JSON: {}", e)))
}

fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<AdminAuth, RegistryError> {
    let presented = headers
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| RegistryError::Forbidden("missing X-Admin-Key header".to_string()))?;
    AdminAuth::verify(presented, &state.admin_api_key)
}

/// POST /members/register
pub async fn register_member_handler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Member>), RegistryError> {
    let (profile, image) = read_profile_multipart(multipart).await?;
    let request: RegisterRequest = parse_profile(profile)?;

    let new_member = NewMember {
        email: request.email,
        name: request.name,
        generation: request.generation,
        rank: request.rank,
        description: request.description,
        skills: request.skills,
        links: request.links,
    };

    let member = actions::register_member(new_member, image, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /members/:id
pub async fn get_member_handler(
    Extension(state): Extension<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Member>, RegistryError> {
    let member = actions::get_member(member_id, &state.deps).await?;
    Ok(Json(member))
}

/// GET /members?status=PENDING
pub async fn list_members_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Member>>, RegistryError> {
    let members = actions::list_members(params.status, &state.deps).await?;
    Ok(Json(members))
}

/// PUT /members/:id?token=...
///
/// Magic-link authenticated self-service update. The token's identity is
/// authoritative; the path id is checked against it.
pub async fn update_member_handler(
    Extension(state): Extension<AppState>,
    Path(member_id): Path<Uuid>,
    Query(params): Query<UpdateParams>,
    multipart: Multipart,
) -> Result<Json<Member>, RegistryError> {
    let (profile, image) = read_profile_multipart(multipart).await?;
    let request: UpdateRequest = match profile {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| RegistryError::Validation(format!("invalid profile JSON: {}", e)))?,
        // Image-only updates have no profile part
        None => UpdateRequest {
            name: None,
            description: None,
            skills: None,
            links: None,
        },
    };

    let changes = ProfileChanges {
        name: request.name,
        description: request.description,
        image_url: None,
        skills: request.skills,
        links: request.links,
    };

    let member =
        actions::update_profile(&params.token, member_id, changes, image, &state.deps).await?;
    Ok(Json(member))
}

/// POST /members/:id/approve (admin only)
pub async fn approve_member_handler(
    Extension(state): Extension<AppState>,
    Path(member_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Member>, RegistryError> {
    let admin = require_admin(&headers, &state)?;
    let member = actions::approve_member(admin, member_id, &state.deps).await?;
    Ok(Json(member))
}

/// POST /members/:id/reject (admin only)
pub async fn reject_member_handler(
    Extension(state): Extension<AppState>,
    Path(member_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, RegistryError> {
    let admin = require_admin(&headers, &state)?;
    actions::reject_member(admin, member_id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /members/:id (admin only)
pub async fn delete_member_handler(
    Extension(state): Extension<AppState>,
    Path(member_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, RegistryError> {
    let admin = require_admin(&headers, &state)?;
    actions::delete_member(admin, member_id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
