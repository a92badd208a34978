pub mod auth;
pub mod health;
pub mod members;

pub use auth::{
    request_profile_update_handler, verify_handler, verify_profile_update_handler,
    verify_profile_update_json_handler,
};
pub use health::health_handler;
pub use members::{
    approve_member_handler, delete_member_handler, get_member_handler, list_members_handler,
    register_member_handler, reject_member_handler, update_member_handler,
};
