//! Profile image storage.
//!
//! Filesystem-backed implementation of `BaseStorageService`: images land
//! under `{root}/profiles/{member_id}/{filename}` and are served from a
//! configured public URL prefix. `is_managed` keys off that prefix so
//! member-supplied external image URLs are never touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::config::Config;
use crate::kernel::BaseStorageService;

pub struct FsStorageService {
    root: PathBuf,
    public_url: String,
}

impl FsStorageService {
    pub fn new(root: PathBuf, public_url: String) -> Self {
        Self {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Strip path separators and anything else that could escape the
    /// member's directory.
    fn sanitize_filename(filename: &str) -> String {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("profile.jpg");
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn url_to_key(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_url)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty() && !key.contains(".."))
    }
}

#[async_trait]
impl BaseStorageService for FsStorageService {
    async fn put_image(&self, bytes: &[u8], owner_id: Uuid, filename: &str) -> Result<String> {
        let safe_name = Self::sanitize_filename(filename);
        let key = format!("profiles/{}/{}", owner_id, safe_name);
        let path = self.key_to_path(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        let url = format!("{}/{}", self.public_url, key);
        tracing::info!(key = %key, url = %url, "Stored profile image");
        Ok(url)
    }

    async fn delete_image(&self, url: &str) -> Result<()> {
        let Some(key) = self.url_to_key(url) else {
            tracing::info!(url = %url, "Skipping deletion of non-managed URL");
            return Ok(());
        };

        let path = self.key_to_path(&key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %key, "Deleted profile image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }

    fn is_managed(&self, url: &str) -> bool {
        self.url_to_key(url).is_some()
    }
}

/// Build the storage backend from configuration.
pub fn create_storage_service(config: &Config) -> Arc<dyn BaseStorageService> {
    Arc::new(FsStorageService::new(
        config.storage_root.clone(),
        config.storage_public_url.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FsStorageService {
        FsStorageService::new(
            std::env::temp_dir().join("registry-storage-test"),
            "http://localhost:8000/media".to_string(),
        )
    }

    #[test]
    fn test_sanitize_filename_strips_path_components() {
        assert_eq!(
            FsStorageService::sanitize_filename("../../etc/passwd"),
            "passwd"
        );
        assert_eq!(FsStorageService::sanitize_filename("me photo.png"), "me_photo.png");
    }

    #[test]
    fn test_managed_url_detection() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(svc.is_managed(&format!("http://localhost:8000/media/profiles/{}/a.png", id)));
        assert!(!svc.is_managed("https://imgur.com/abc.png"));
        assert!(!svc.is_managed("http://localhost:8000/media/"));
        assert!(!svc.is_managed("http://localhost:8000/media/../secrets"));
    }

    #[tokio::test]
    async fn test_put_then_delete_roundtrip() {
        let svc = service();
        let id = Uuid::new_v4();
        let url = svc.put_image(b"\x89PNGdata", id, "avatar.png").await.unwrap();

        assert!(svc.is_managed(&url));
        svc.delete_image(&url).await.unwrap();
        // Deleting again is a no-op, not an error
        svc.delete_image(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_external_url_is_noop() {
        let svc = service();
        assert!(svc.delete_image("https://imgur.com/abc.png").await.is_ok());
    }
}
