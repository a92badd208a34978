use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Member lifecycle status.
///
/// Stored uppercase in Postgres (`member_status` enum). A member is in
/// exactly one status at any time; transitions go through
/// `machines::apply`, never by writing the column directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "member_status", rename_all = "UPPERCASE")]
pub enum MemberStatus {
    /// Registered, email not yet verified
    Unverified,
    /// Email verified, awaiting admin approval
    Pending,
    /// Admin approved; full member
    Approved,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberStatus::Unverified => "UNVERIFIED",
            MemberStatus::Pending => "PENDING",
            MemberStatus::Approved => "APPROVED",
        };
        write!(f, "{}", s)
    }
}

/// Membership rank. Immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "member_rank", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRank {
    Regular,
    Ob,
    ProspectiveOb,
}

/// Kind of external profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "link_type", rename_all = "snake_case")]
pub enum LinkType {
    Github,
    Linkedin,
    Blog,
    Instagram,
    Notion,
    SolvedAc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub member_id: Uuid,
    pub skill_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: Uuid,
    pub member_id: Uuid,
    pub link_type: LinkType,
    pub url: String,
}

/// Member aggregate. Skills and links are fully owned: deleted with the
/// parent, replaced wholesale on update.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub generation: i32,
    pub rank: MemberRank,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub skills: Vec<Skill>,
    pub links: Vec<Link>,
}

/// Skill input as it appears in the public contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInput {
    pub skill_name: String,
}

/// Link input as it appears in the public contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkInput {
    pub link_type: LinkType,
    pub url: String,
}

/// Fields for creating a member. Status always starts at UNVERIFIED.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub generation: i32,
    pub rank: MemberRank,
    pub description: Option<String>,
    pub skills: Vec<SkillInput>,
    pub links: Vec<LinkInput>,
}

/// Partial profile update. `None` leaves the field untouched; `Some`
/// skills/links replace the existing set wholesale. Rank and generation
/// are deliberately absent: immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub skills: Option<Vec<SkillInput>>,
    pub links: Option<Vec<LinkInput>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.skills.is_none()
            && self.links.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&MemberStatus::Unverified).unwrap();
        assert_eq!(json, "\"UNVERIFIED\"");
        let json = serde_json::to_string(&MemberStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn test_link_type_serializes_snake_case() {
        let json = serde_json::to_string(&LinkType::SolvedAc).unwrap();
        assert_eq!(json, "\"solved_ac\"");
    }

    #[test]
    fn test_empty_changes() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
