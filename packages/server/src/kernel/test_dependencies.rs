// Test dependencies - mock implementations for testing
//
// Provides an in-memory repository and recording collaborators that can be
// wired into ServerDeps for tests. Lives in the library (not behind
// cfg(test)) so integration tests under tests/ can use it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domains::member::models::{
    Link, Member, MemberStatus, NewMember, ProfileChanges, Skill,
};
use crate::kernel::{BaseEmailService, BaseMemberRepository, BaseStorageService};

// =============================================================================
// In-memory Member Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryMemberRepository {
    members: Mutex<HashMap<Uuid, Member>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored members (test assertions).
    pub fn len(&self) -> usize {
        self.members.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseMemberRepository for InMemoryMemberRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        Ok(self.members.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .values()
            .find(|m| m.email == email)
            .cloned())
    }

    async fn list(&self, status: Option<MemberStatus>) -> Result<Vec<Member>> {
        let members = self.members.lock().unwrap();
        let mut result: Vec<Member> = members
            .values()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create(&self, new: NewMember) -> Result<Member> {
        let mut members = self.members.lock().unwrap();
        if members.values().any(|m| m.email == new.email) {
            anyhow::bail!("unique constraint violation on email: {}", new.email);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let member = Member {
            id,
            email: new.email,
            name: new.name,
            generation: new.generation,
            rank: new.rank,
            description: new.description,
            image_url: None,
            status: MemberStatus::Unverified,
            created_at: now,
            updated_at: now,
            skills: new
                .skills
                .into_iter()
                .map(|s| Skill {
                    id: Uuid::new_v4(),
                    member_id: id,
                    skill_name: s.skill_name,
                })
                .collect(),
            links: new
                .links
                .into_iter()
                .map(|l| Link {
                    id: Uuid::new_v4(),
                    member_id: id,
                    link_type: l.link_type,
                    url: l.url,
                })
                .collect(),
        };
        members.insert(id, member.clone());
        Ok(member)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Member> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("member not found: {}", id))?;

        if let Some(name) = changes.name {
            member.name = name;
        }
        if let Some(description) = changes.description {
            member.description = Some(description);
        }
        if let Some(image_url) = changes.image_url {
            member.image_url = Some(image_url);
        }
        if let Some(skills) = changes.skills {
            member.skills = skills
                .into_iter()
                .map(|s| Skill {
                    id: Uuid::new_v4(),
                    member_id: id,
                    skill_name: s.skill_name,
                })
                .collect();
        }
        if let Some(links) = changes.links {
            member.links = links
                .into_iter()
                .map(|l| Link {
                    id: Uuid::new_v4(),
                    member_id: id,
                    link_type: l.link_type,
                    url: l.url,
                })
                .collect();
        }
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn set_image_url(&self, id: Uuid, image_url: Option<String>) -> Result<Member> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("member not found: {}", id))?;
        member.image_url = image_url;
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        expected: MemberStatus,
        next: MemberStatus,
    ) -> Result<Option<Member>> {
        let mut members = self.members.lock().unwrap();
        match members.get_mut(&id) {
            Some(member) if member.status == expected => {
                member.status = next;
                member.updated_at = Utc::now();
                Ok(Some(member.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.members.lock().unwrap().remove(&id);
        Ok(())
    }
}

// =============================================================================
// Recording Email Service
// =============================================================================

/// Captured (email, link_url) pairs from send_magic_link
#[derive(Debug, Clone)]
pub struct MagicLinkCall {
    pub email: String,
    pub link_url: String,
}

#[derive(Default)]
pub struct RecordingEmailService {
    magic_links: Arc<Mutex<Vec<MagicLinkCall>>>,
    approvals: Arc<Mutex<Vec<(String, String)>>>,
    rejections: Arc<Mutex<Vec<(String, String)>>>,
    fail_sends: Arc<Mutex<bool>>,
}

impl RecordingEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send return an error (failures must not propagate
    /// out of mutations).
    pub fn failing(self) -> Self {
        *self.fail_sends.lock().unwrap() = true;
        self
    }

    pub fn magic_links(&self) -> Vec<MagicLinkCall> {
        self.magic_links.lock().unwrap().clone()
    }

    /// Last magic link sent to `email`, if any
    pub fn last_magic_link_for(&self, email: &str) -> Option<MagicLinkCall> {
        self.magic_links
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.email == email)
            .cloned()
    }

    pub fn approvals(&self) -> Vec<(String, String)> {
        self.approvals.lock().unwrap().clone()
    }

    pub fn rejections(&self) -> Vec<(String, String)> {
        self.rejections.lock().unwrap().clone()
    }

    fn maybe_fail(&self) -> Result<()> {
        if *self.fail_sends.lock().unwrap() {
            anyhow::bail!("simulated email outage");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseEmailService for RecordingEmailService {
    async fn send_magic_link(&self, email: &str, link_url: &str) -> Result<()> {
        self.magic_links.lock().unwrap().push(MagicLinkCall {
            email: email.to_string(),
            link_url: link_url.to_string(),
        });
        self.maybe_fail()
    }

    async fn send_approval(&self, email: &str, member_name: &str) -> Result<()> {
        self.approvals
            .lock()
            .unwrap()
            .push((email.to_string(), member_name.to_string()));
        self.maybe_fail()
    }

    async fn send_rejection(&self, email: &str, member_name: &str) -> Result<()> {
        self.rejections
            .lock()
            .unwrap()
            .push((email.to_string(), member_name.to_string()));
        self.maybe_fail()
    }
}

// =============================================================================
// Recording Storage Service
// =============================================================================

#[derive(Default)]
pub struct RecordingStorageService {
    uploads: Arc<Mutex<Vec<(Uuid, String)>>>,
    deletions: Arc<Mutex<Vec<String>>>,
    fail_uploads: Arc<Mutex<bool>>,
}

impl RecordingStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload fail (registration must survive, update must not).
    pub fn failing(self) -> Self {
        *self.fail_uploads.lock().unwrap() = true;
        self
    }

    pub fn uploads(&self) -> Vec<(Uuid, String)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletions(&self) -> Vec<String> {
        self.deletions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseStorageService for RecordingStorageService {
    async fn put_image(&self, _bytes: &[u8], owner_id: Uuid, filename: &str) -> Result<String> {
        if *self.fail_uploads.lock().unwrap() {
            anyhow::bail!("simulated storage outage");
        }
        self.uploads
            .lock()
            .unwrap()
            .push((owner_id, filename.to_string()));
        Ok(format!(
            "https://storage.test/profiles/{}/{}",
            owner_id, filename
        ))
    }

    async fn delete_image(&self, url: &str) -> Result<()> {
        self.deletions.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn is_managed(&self, url: &str) -> bool {
        url.starts_with("https://storage.test/")
    }
}
