//! Read-side queries.

use uuid::Uuid;

use crate::common::error::{RegistryError, RegistryResult};
use crate::domains::member::models::{Member, MemberStatus};
use crate::kernel::ServerDeps;

pub async fn get_member(member_id: Uuid, deps: &ServerDeps) -> RegistryResult<Member> {
    deps.repo
        .find_by_id(member_id)
        .await?
        .ok_or_else(|| RegistryError::NotFound(member_id.to_string()))
}

pub async fn list_members(
    status: Option<MemberStatus>,
    deps: &ServerDeps,
) -> RegistryResult<Vec<Member>> {
    Ok(deps.repo.list(status).await?)
}
