// Main entry point for the membership registry API server

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use registry_core::domains::auth::{MagicLinkService, RedirectValidator};
use registry_core::domains::member::data::PgMemberRepository;
use registry_core::kernel::{create_email_service, create_storage_service, ServerDeps};
use registry_core::server::build_app;
use registry_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,registry_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting membership registry API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire dependencies
    let deps = Arc::new(ServerDeps::new(
        Arc::new(PgMemberRepository::new(pool.clone())),
        create_email_service(&config),
        create_storage_service(&config),
        Arc::new(MagicLinkService::new(
            &config.token_secret,
            Duration::minutes(config.magic_link_ttl_minutes),
        )),
        RedirectValidator::new(
            &config.allowed_redirect_origins,
            config.default_redirect.clone(),
        ),
        config.base_url.clone(),
    ));

    // Build application
    let app = build_app(deps, pool, config.admin_api_key.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
