//! # NoteHub API Server
//!
//! HTTP backend for NoteHub: registration, token login, per-user note
//! CRUD with categories and tags, public share links, and an admin role
//! for moderation.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p notehub-api
//! ```

use notehub_api::{
    app::{bootstrap_admin, build_router, AppState},
    config::Config,
};
use notehub_shared::db::{migrations::run_migrations, pool::create_pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notehub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "NoteHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    if let Some(admin) = &config.admin {
        bootstrap_admin(&pool, &admin.username, &admin.password).await?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
