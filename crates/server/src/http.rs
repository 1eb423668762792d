//! HTTP endpoints
//!
//! REST API for the routing engine.

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use georoute_core::{Query, RoutingResult};

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );
    let timeout = std::time::Duration::from_millis(state.settings.server.request_timeout_ms);

    Router::new()
        // Routing
        .route("/api/route", post(route_query))
        // Introspection
        .route("/api/endpoints", get(list_endpoints))
        .route("/api/stats", get(stats))
        // Admin
        .route("/admin/reload", post(reload_config))
        // Health
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins
///
/// Disabled -> permissive (development only); no origins configured ->
/// localhost:3000 for safety.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("no CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Routing request body
#[derive(Debug, Deserialize)]
struct RouteRequest {
    query: String,
    #[serde(default)]
    conversation_context: Option<String>,
    #[serde(default)]
    field_hint: Option<String>,
}

/// Route a query
async fn route_query(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Json<RoutingResult> {
    let request_id = Uuid::new_v4();
    tracing::debug!(%request_id, query = %request.query, "routing request");

    let mut query = Query::new(request.query);
    if let Some(context) = request.conversation_context {
        query = query.with_context(context);
    }
    if let Some(hint) = request.field_hint {
        query = query.with_field_hint(hint);
    }

    Json(state.router.route(&query).await)
}

/// List configured endpoints
async fn list_endpoints(State(state): State<AppState>) -> Json<serde_json::Value> {
    let domain = state.router.domain_snapshot();
    let endpoints: Vec<serde_json::Value> = domain
        .endpoints
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e.id,
                "visualization": e.visualization,
                "required_fields": e.required_fields,
                "min_confidence": e.min_confidence,
                "comparative": e.comparative,
            })
        })
        .collect();

    Json(serde_json::json!({
        "domain": domain.domain,
        "version": domain.version,
        "endpoints": endpoints,
    }))
}

/// Routing counters
async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.router.stats();
    Json(serde_json::to_value(stats).unwrap_or_default())
}

/// Reload the domain configuration, swap-on-success
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.manager.reload() {
        Ok(()) => {
            let domain = state.manager.snapshot();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "reloaded",
                    "version": domain.version,
                    "endpoints": domain.endpoints.len(),
                })),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "configuration reload failed, keeping active config");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "status": "rejected",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = (chrono::Utc::now() - state.started_at).num_seconds();
    let stats = state.router.stats();

    Json(serde_json::json!({
        "status": "ready",
        "uptime_seconds": uptime,
        "queries": stats.total_queries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use georoute_config::Settings;

    #[test]
    fn test_router_creation() {
        let state = AppState::from_settings(Settings::default()).unwrap();
        let _ = create_router(state);
    }
}
