// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The
// registration/approval orchestration lives in domain actions that use
// these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEmailService)

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::member::models::{Member, MemberStatus, NewMember, ProfileChanges};

// =============================================================================
// Member Repository Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseMemberRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>>;

    /// List members, optionally filtered by status, newest first.
    async fn list(&self, status: Option<MemberStatus>) -> Result<Vec<Member>>;

    /// Create a member in UNVERIFIED status together with its skills and
    /// links, atomically.
    async fn create(&self, member: NewMember) -> Result<Member>;

    /// Apply a partial profile update atomically. `Some` skills/links
    /// replace the existing set wholesale (delete-all-then-insert).
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Member>;

    /// Set the image URL outside of a profile update (post-create upload).
    async fn set_image_url(&self, id: Uuid, image_url: Option<String>) -> Result<Member>;

    /// Conditionally move a member from `expected` to `next` status.
    ///
    /// Compare-and-swap: the write succeeds only if the row's status still
    /// equals `expected` at commit time, so two racing transitions cannot
    /// both pass their precondition. Returns `None` when the condition no
    /// longer holds (raced or record gone).
    async fn transition_status(
        &self,
        id: Uuid,
        expected: MemberStatus,
        next: MemberStatus,
    ) -> Result<Option<Member>>;

    /// Delete a member and its owned skills/links.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// Email Service Trait (Infrastructure - notifications)
// =============================================================================

/// Fire-and-forget from the core's perspective: the orchestrator logs
/// failures and never fails a mutation because mail did not go out.
#[async_trait]
pub trait BaseEmailService: Send + Sync {
    /// Send a magic-link email containing `link_url`
    async fn send_magic_link(&self, email: &str, link_url: &str) -> Result<()>;

    /// Notify a member their registration was approved
    async fn send_approval(&self, email: &str, member_name: &str) -> Result<()>;

    /// Notify a member their registration was rejected
    async fn send_rejection(&self, email: &str, member_name: &str) -> Result<()>;
}

// =============================================================================
// Storage Service Trait (Infrastructure - profile images)
// =============================================================================

#[async_trait]
pub trait BaseStorageService: Send + Sync {
    /// Store image bytes under the owning member's id, returning the
    /// public URL.
    async fn put_image(&self, bytes: &[u8], owner_id: Uuid, filename: &str) -> Result<String>;

    /// Delete a stored image. No-op for URLs this service does not manage.
    async fn delete_image(&self, url: &str) -> Result<()>;

    /// Whether this service manages the given URL (member-supplied
    /// external URLs are never deleted).
    fn is_managed(&self, url: &str) -> bool;
}
