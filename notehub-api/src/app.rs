/// Application state and router builder
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                  # public
/// ├── /user/register           # public
/// ├── /user/login              # public
/// ├── /share/view              # public (share token is the credential)
/// ├── /user/*, /note/*, /share/enable|disable   # bearer auth
/// └── /admin/*                 # bearer auth + admin role
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication / admin gate (per route group)
///
/// Services are constructed at startup and passed in through
/// [`AppState`]; there are no process-wide mutable handles.

use crate::{config::Config, middleware::auth, routes};
use axum::{
    routing::{get, post},
    Router,
};
use notehub_shared::{
    auth::password::hash_password,
    models::user::{CreateUser, Role, User},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; uses
/// Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Example
///
/// ```no_run
/// use notehub_api::app::{build_router, AppState};
/// use notehub_api::config::Config;
/// use notehub_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(state: AppState) -> Router {
    // Public routes: no auth. The share view authenticates by token value.
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/user/register", post(routes::user::register))
        .route("/user/login", post(routes::user::login))
        .route("/share/view", get(routes::share::view));

    // Routes that require a resolved user
    let authed_routes = Router::new()
        .route("/user/logout", post(routes::user::logout))
        .route("/user/me", get(routes::user::me))
        .route("/user/changePassword", post(routes::user::change_password))
        .route("/note/create", post(routes::note::create))
        .route("/note/update", post(routes::note::update))
        .route("/note/delete", post(routes::note::delete))
        .route("/note/detail", get(routes::note::detail))
        .route("/note/list", get(routes::note::list))
        .route("/note/tags", get(routes::note::tags))
        .route("/note/categories", get(routes::note::categories))
        .route("/share/enable", post(routes::share::enable))
        .route("/share/disable", post(routes::share::disable))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Admin routes: the admin gate runs after authentication, so an
    // unauthenticated request is 401 and a non-admin one is 403
    let admin_routes = Router::new()
        .route("/admin/users", get(routes::admin::list_users))
        .route("/admin/user/delete", post(routes::admin::delete_user))
        .route("/admin/notes", get(routes::admin::list_notes))
        .route("/admin/note/delete", post(routes::admin::delete_note))
        .route("/admin/logs", get(routes::admin::logs))
        .layer(axum::middleware::from_fn(auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Ensures the configured admin bootstrap account exists
///
/// Creates the account with the admin role, or promotes it if it was
/// registered as a plain user. Registration never creates admins, so
/// this is the only way to mint the first one.
pub async fn bootstrap_admin(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    match User::find_by_username(pool, username).await? {
        Some(user) if user.role.is_admin() => {}
        Some(user) => {
            User::set_role(pool, user.id, Role::Admin).await?;
            tracing::info!(username = %username, "Promoted existing user to admin");
        }
        None => {
            let password_hash = hash_password(password)?;
            User::create(
                pool,
                CreateUser {
                    username: username.to_string(),
                    password_hash,
                    role: Role::Admin,
                },
            )
            .await?;
            tracing::info!(username = %username, "Created bootstrap admin account");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_shared::db::{migrations::run_migrations, pool::create_test_pool};

    #[tokio::test]
    async fn test_bootstrap_admin_creates_and_promotes() {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        bootstrap_admin(&pool, "root", "root-password").await.unwrap();
        let admin = User::find_by_username(&pool, "root").await.unwrap().unwrap();
        assert!(admin.role.is_admin());

        // Running again is a no-op
        bootstrap_admin(&pool, "root", "root-password").await.unwrap();

        // An existing plain user gets promoted
        let hash = hash_password("pw").unwrap();
        User::create(
            &pool,
            CreateUser {
                username: "carol".to_string(),
                password_hash: hash,
                role: Role::User,
            },
        )
        .await
        .unwrap();

        bootstrap_admin(&pool, "carol", "ignored").await.unwrap();
        let carol = User::find_by_username(&pool, "carol").await.unwrap().unwrap();
        assert!(carol.role.is_admin());
    }
}
