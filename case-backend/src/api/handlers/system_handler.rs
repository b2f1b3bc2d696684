// src/api/handlers/system_handler.rs

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// ヘルスチェック（認証不要）
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn system_router() -> Router {
    Router::new().route("/health", get(health_handler))
}
