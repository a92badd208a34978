//! Server dependencies for domain actions (using traits for testability)
//!
//! Central dependency container handed to every orchestration function.
//! All external collaborators sit behind trait objects so tests can swap
//! in the mocks from `kernel::test_dependencies`.

use std::sync::Arc;

use crate::domains::auth::{MagicLinkService, RedirectValidator};
use crate::kernel::{BaseEmailService, BaseMemberRepository, BaseStorageService};

#[derive(Clone)]
pub struct ServerDeps {
    pub repo: Arc<dyn BaseMemberRepository>,
    pub email: Arc<dyn BaseEmailService>,
    pub storage: Arc<dyn BaseStorageService>,
    pub magic_link: Arc<MagicLinkService>,
    pub redirects: RedirectValidator,
    /// Base URL magic links point back at (this API's public address)
    pub base_url: String,
}

impl ServerDeps {
    pub fn new(
        repo: Arc<dyn BaseMemberRepository>,
        email: Arc<dyn BaseEmailService>,
        storage: Arc<dyn BaseStorageService>,
        magic_link: Arc<MagicLinkService>,
        redirects: RedirectValidator,
        base_url: String,
    ) -> Self {
        Self {
            repo,
            email,
            storage,
            magic_link,
            redirects,
            base_url,
        }
    }
}
