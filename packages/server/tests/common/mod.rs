// Shared test harness: ServerDeps wired with the in-memory repository and
// recording collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use registry_core::domains::auth::{MagicLinkService, RedirectValidator};
use registry_core::domains::member::models::{LinkInput, MemberRank, NewMember, SkillInput};
use registry_core::kernel::test_dependencies::{
    InMemoryMemberRepository, RecordingEmailService, RecordingStorageService,
};
use registry_core::kernel::ServerDeps;

pub const ADMIN_KEY: &str = "test-admin-key";

pub struct Harness {
    pub deps: ServerDeps,
    pub repo: Arc<InMemoryMemberRepository>,
    pub email: Arc<RecordingEmailService>,
    pub storage: Arc<RecordingStorageService>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(RecordingEmailService::new(), RecordingStorageService::new())
    }

    pub fn with_failing_email() -> Self {
        Self::build(
            RecordingEmailService::new().failing(),
            RecordingStorageService::new(),
        )
    }

    pub fn with_failing_storage() -> Self {
        Self::build(
            RecordingEmailService::new(),
            RecordingStorageService::new().failing(),
        )
    }

    fn build(email: RecordingEmailService, storage: RecordingStorageService) -> Self {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let email = Arc::new(email);
        let storage = Arc::new(storage);

        let deps = ServerDeps::new(
            repo.clone(),
            email.clone(),
            storage.clone(),
            Arc::new(MagicLinkService::new(
                "test_secret_key",
                Duration::minutes(30),
            )),
            RedirectValidator::new(
                &["https://good.example".to_string()],
                "https://good.example".to_string(),
            ),
            "http://localhost:8000".to_string(),
        );

        Self {
            deps,
            repo,
            email,
            storage,
        }
    }
}

pub fn new_member(email: &str, name: &str) -> NewMember {
    NewMember {
        email: email.to_string(),
        name: name.to_string(),
        generation: 41,
        rank: MemberRank::Regular,
        description: Some("hello".to_string()),
        skills: vec![SkillInput {
            skill_name: "Rust".to_string(),
        }],
        links: vec![LinkInput {
            link_type: registry_core::domains::member::models::LinkType::Github,
            url: "https://github.com/a".to_string(),
        }],
    }
}

/// Pull the token out of a captured magic-link URL.
pub fn extract_token(link_url: &str) -> String {
    let url = url::Url::parse(link_url).expect("magic link is a valid URL");
    url.query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
        .expect("magic link carries a token parameter")
}

/// A minimal valid PNG payload for upload tests.
pub fn png_upload() -> registry_core::domains::member::actions::ImageUpload {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    registry_core::domains::member::actions::ImageUpload {
        filename: "avatar.png".to_string(),
        content_type: "image/png".to_string(),
        bytes,
    }
}
