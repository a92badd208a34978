pub mod auth;
pub mod member;
