// Club Membership Registry - API Core
//
// Applicants register, verify their email through a time-limited magic
// link, await admin approval, and update their profile through the same
// link mechanism. Core orchestration lives in domains/member/actions and
// runs against trait-injected collaborators (kernel/traits.rs), so all
// behavior is testable without HTTP or Postgres.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
