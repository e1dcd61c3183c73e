//! Common routes: health with database ping, liveness, version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::time::{Duration, Instant};

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize, Debug)]
struct HealthBody {
    status: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    version: String,
    uptime: String,
    database: DatabaseStatus,
}

#[derive(Serialize, Debug)]
struct DatabaseStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency: Option<String>,
}

#[derive(Serialize)]
struct LiveBody {
    status: &'static str,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let uptime = format!("{}s", state.started_at.elapsed().as_secs());
    let start = Instant::now();
    let ping = tokio::time::timeout(PING_TIMEOUT, state.pinger.ping()).await;
    let database = match ping {
        Ok(Ok(())) => DatabaseStatus {
            status: "healthy",
            latency: Some(format!("{:?}", start.elapsed())),
        },
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "database ping failed");
            DatabaseStatus {
                status: "unhealthy",
                latency: None,
            }
        }
        Err(_) => {
            tracing::warn!(timeout = ?PING_TIMEOUT, "database ping timed out");
            DatabaseStatus {
                status: "unhealthy",
                latency: None,
            }
        }
    };
    let (code, status) = if database.latency.is_some() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthBody {
            status,
            version: state.version.clone(),
            uptime,
            database,
        }),
    )
}

async fn live() -> Json<LiveBody> {
    Json(LiveBody { status: "ok" })
}

async fn version(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": state.version,
    }))
}

/// GET /health, GET /health/live, GET /version. Never behind the API key.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(live))
        .route("/version", get(version))
        .with_state(state)
}
