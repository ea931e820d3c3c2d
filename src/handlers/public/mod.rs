// handlers/public/mod.rs - Public handlers (no session required)

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Compliance Portal API",
            "version": version,
            "description": "Role-gated compliance back office: tasks, evidence, reminders and dashboards",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "session": "/api/session (any caller)",
                "customer": "/api/tasks, /api/reminders, /api/evidence, /api/agenda, /api/dashboard, /api/audit-packs (customer guard)",
                "admin": "/api/admin/* (admin guard)",
                "platform": "/api/platform/* (platform admin guard)",
            }
        }
    }))
}

/// GET /health - liveness plus database reachability when one is configured
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    if !DatabaseManager::is_configured() {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "not_configured" }
            })),
        );
    }

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
