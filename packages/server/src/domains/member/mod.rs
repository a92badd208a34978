//! Member domain - registration, verification, approval and profile
//! self-service.

pub mod actions;
pub mod data;
pub mod guard;
pub mod machines;
pub mod models;

pub use models::{Member, MemberRank, MemberStatus};
