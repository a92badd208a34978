// End-to-end registration lifecycle over the in-memory collaborators:
// register -> verify email -> admin approve/reject/delete.

mod common;

use common::{extract_token, new_member, png_upload, Harness, ADMIN_KEY};
use registry_core::common::auth::AdminAuth;
use registry_core::common::error::RegistryError;
use registry_core::domains::member::actions::{
    approve_member, delete_member, register_member, reject_member, verify_email,
};
use registry_core::domains::member::models::MemberStatus;
use registry_core::kernel::BaseMemberRepository;

fn admin() -> AdminAuth {
    AdminAuth::verify(ADMIN_KEY, ADMIN_KEY).unwrap()
}

#[tokio::test]
async fn test_register_creates_unverified_member_and_sends_link() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();

    assert_eq!(member.status, MemberStatus::Unverified);
    assert_eq!(member.email, "a@x.com");
    assert_eq!(member.skills.len(), 1);
    assert_eq!(member.links.len(), 1);

    let call = h.email.last_magic_link_for("a@x.com").unwrap();
    assert!(call.link_url.starts_with("http://localhost:8000/auth/verify?token="));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts_and_preserves_first() {
    let h = Harness::new();

    let first = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();

    let err = register_member(new_member("a@x.com", "Impostor"), None, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists(_)));

    // First record untouched
    let stored = h.repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "A");
    assert_eq!(h.repo.len(), 1);
}

#[tokio::test]
async fn test_full_flow_register_verify_approve() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();
    assert_eq!(member.status, MemberStatus::Unverified);

    let token = extract_token(&h.email.last_magic_link_for("a@x.com").unwrap().link_url);
    let member = verify_email(&token, &h.deps).await.unwrap();
    assert_eq!(member.status, MemberStatus::Pending);

    let member = approve_member(admin(), member.id, &h.deps).await.unwrap();
    assert_eq!(member.status, MemberStatus::Approved);

    // Approval notification sent exactly once, with email and name
    assert_eq!(
        h.email.approvals(),
        vec![("a@x.com".to_string(), "A".to_string())]
    );
}

#[tokio::test]
async fn test_verify_with_tampered_token_is_invalid() {
    let h = Harness::new();

    register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();
    let token = extract_token(&h.email.last_magic_link_for("a@x.com").unwrap().link_url);

    let tampered = format!("{}x", token);
    let err = verify_email(&tampered, &h.deps).await.unwrap_err();
    assert!(matches!(err, RegistryError::InvalidToken));

    // Status unchanged
    let member = h.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(member.status, MemberStatus::Unverified);
}

#[tokio::test]
async fn test_verify_twice_is_invalid_transition() {
    let h = Harness::new();

    register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();
    let token = extract_token(&h.email.last_magic_link_for("a@x.com").unwrap().link_url);

    verify_email(&token, &h.deps).await.unwrap();
    // Token is still cryptographically valid, but the member already moved on
    let err = verify_email(&token, &h.deps).await.unwrap_err();
    match err {
        RegistryError::InvalidTransition { current, .. } => {
            assert_eq!(current, MemberStatus::Pending)
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[tokio::test]
async fn test_approve_requires_pending() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();

    let err = approve_member(admin(), member.id, &h.deps).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidTransition {
            current: MemberStatus::Unverified,
            ..
        }
    ));
    assert!(h.email.approvals().is_empty());
}

#[tokio::test]
async fn test_approve_unknown_member_not_found() {
    let h = Harness::new();
    let err = approve_member(admin(), uuid::Uuid::new_v4(), &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_reject_deletes_pending_member_without_notification() {
    let h = Harness::new();

    register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();
    let token = extract_token(&h.email.last_magic_link_for("a@x.com").unwrap().link_url);
    let member = verify_email(&token, &h.deps).await.unwrap();

    reject_member(admin(), member.id, &h.deps).await.unwrap();

    assert!(h.repo.find_by_id(member.id).await.unwrap().is_none());
    assert!(h.email.rejections().is_empty());
}

#[tokio::test]
async fn test_reject_approved_member_is_invalid_transition() {
    let h = Harness::new();

    register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();
    let token = extract_token(&h.email.last_magic_link_for("a@x.com").unwrap().link_url);
    let member = verify_email(&token, &h.deps).await.unwrap();
    let member = approve_member(admin(), member.id, &h.deps).await.unwrap();

    let err = reject_member(admin(), member.id, &h.deps).await.unwrap_err();
    assert!(matches!(err, RegistryError::InvalidTransition { .. }));
    assert!(h.repo.find_by_id(member.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_works_from_any_status() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();

    delete_member(admin(), member.id, &h.deps).await.unwrap();
    assert!(h.repo.is_empty());
}

#[tokio::test]
async fn test_email_outage_does_not_fail_registration() {
    let h = Harness::with_failing_email();

    let member = register_member(new_member("a@x.com", "A"), None, &h.deps)
        .await
        .unwrap();

    assert_eq!(member.status, MemberStatus::Unverified);
    assert_eq!(h.repo.len(), 1);
}

#[tokio::test]
async fn test_register_with_image_attaches_url() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), Some(png_upload()), &h.deps)
        .await
        .unwrap();

    let url = member.image_url.expect("image url attached");
    assert!(url.contains(&member.id.to_string()));
    assert_eq!(h.storage.uploads().len(), 1);
}

#[tokio::test]
async fn test_image_upload_failure_does_not_abort_registration() {
    let h = Harness::with_failing_storage();

    let member = register_member(new_member("a@x.com", "A"), Some(png_upload()), &h.deps)
        .await
        .unwrap();

    // Member exists, just without an image; it can be added later
    assert_eq!(member.status, MemberStatus::Unverified);
    assert!(member.image_url.is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_image_before_creating_member() {
    let h = Harness::new();

    let mut upload = png_upload();
    upload.bytes = b"<html>not an image</html>".to_vec();

    let err = register_member(new_member("a@x.com", "A"), Some(upload), &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
    assert!(h.repo.is_empty());
}

#[tokio::test]
async fn test_delete_removes_managed_profile_image() {
    let h = Harness::new();

    let member = register_member(new_member("a@x.com", "A"), Some(png_upload()), &h.deps)
        .await
        .unwrap();
    let image_url = member.image_url.clone().unwrap();

    delete_member(admin(), member.id, &h.deps).await.unwrap();
    assert_eq!(h.storage.deletions(), vec![image_url]);
}
