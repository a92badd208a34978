//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    approve_member_handler, delete_member_handler, get_member_handler, health_handler,
    list_members_handler, register_member_handler, reject_member_handler,
    request_profile_update_handler, update_member_handler, verify_handler,
    verify_profile_update_handler, verify_profile_update_json_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub db_pool: PgPool,
    pub admin_api_key: String,
}

/// Build the axum application.
pub fn build_app(deps: Arc<ServerDeps>, db_pool: PgPool, admin_api_key: String) -> Router {
    let state = AppState {
        deps,
        db_pool,
        admin_api_key,
    };

    Router::new()
        .route("/health", get(health_handler))
        // Auth: magic-link verification endpoints
        .route(
            "/auth/magic-link/profile-update",
            post(request_profile_update_handler),
        )
        .route("/auth/verify", get(verify_handler))
        .route(
            "/auth/verify-profile-update",
            get(verify_profile_update_handler),
        )
        .route(
            "/auth/verify-profile-update-json",
            get(verify_profile_update_json_handler),
        )
        // Members
        .route("/members/register", post(register_member_handler))
        .route("/members", get(list_members_handler))
        .route(
            "/members/:id",
            get(get_member_handler)
                .put(update_member_handler)
                .delete(delete_member_handler),
        )
        .route("/members/:id/approve", post(approve_member_handler))
        .route("/members/:id/reject", post(reject_member_handler))
        // Registration and update carry multipart image uploads (5 MiB cap
        // enforced by validation; the body limit leaves headroom for the
        // JSON part)
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
