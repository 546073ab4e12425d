/// Common test utilities for integration tests
///
/// Provides a `TestContext` holding an in-memory SQLite database and the
/// real router, plus helpers for driving the API as an HTTP client:
/// register, login, authenticated requests, note creation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use notehub_api::app::{build_router, AppState};
use notehub_api::config::{ApiConfig, Config};
use notehub_shared::db::migrations::run_migrations;
use notehub_shared::db::pool::{create_test_pool, DatabaseConfig};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::Service as _;

/// Test context containing the database pool and the app under test
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_test_pool().await?;
        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                ..Default::default()
            },
            admin: None,
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request and returns (status, parsed envelope)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Registers a user, asserting success
    pub async fn register(&self, username: &str, password: &str) {
        let (status, body) = self
            .request(
                "POST",
                "/user/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        assert_eq!(body["code"], 0);
    }

    /// Logs a user in and returns the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/user/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in, returning the token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        self.login(username, password).await
    }

    /// Creates an admin account directly and returns its bearer token
    pub async fn admin_token(&self, username: &str, password: &str) -> String {
        notehub_api::app::bootstrap_admin(&self.db, username, password)
            .await
            .unwrap();
        self.login(username, password).await
    }

    /// Creates a note and returns its id as a string
    pub async fn create_note(
        &self,
        token: &str,
        title: &str,
        category: &str,
        tags: &[&str],
    ) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/note/create",
                Some(token),
                Some(serde_json::json!({
                    "title": title,
                    "content": format!("content of {title}"),
                    "category": category,
                    "tags": tags,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "note create failed: {body}");
        body["data"]["noteId"].as_str().unwrap().to_string()
    }
}
