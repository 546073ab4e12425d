/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// Public, always 200 regardless of auth state. Reports database
/// connectivity without failing the request over it.

use crate::{
    app::AppState,
    error::{ok, ApiResult, Envelope},
    extract::Json,
};
use axum::extract::State;
use serde::Serialize;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Envelope<HealthData>>> {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(ok(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
