//! HTTP router and server lifecycle.

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::breeds::{BreedRegistry, CatApiRegistry};
use crate::cats::{CatService, SqliteCatStore};
use crate::config::Config;
use crate::db::Database;
use crate::missions::{MissionService, SqliteMissionStore};

use super::cats as cats_api;
use super::missions as missions_api;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Cat registry and salary management
    pub cats: CatService,
    /// Missions and their targets
    pub missions: MissionService,
}

impl AppState {
    /// Wire the services over one database and a breed registry.
    pub fn new(config: Config, db: Database, breeds: Arc<dyn BreedRegistry>) -> Self {
        let cat_store = Arc::new(SqliteCatStore::new(db.clone()));
        let mission_store = Arc::new(SqliteMissionStore::new(db));
        Self {
            config,
            cats: CatService::new(cat_store.clone(), breeds),
            missions: MissionService::new(mission_store, cat_store),
        }
    }
}

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/cats", cats_api::routes())
        .nest("/missions", missions_api::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let db = Database::open(config.database_path.clone()).await?;
    let breeds: Arc<dyn BreedRegistry> = Arc::new(CatApiRegistry::new(&config.breeds)?);
    tracing::info!("Validating breeds against {}", config.breeds.url);

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, db, breeds));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::breeds::StaticBreedRegistry;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    /// Router over an in-memory database that knows two breeds.
    pub fn test_app() -> Router {
        let db = Database::open_in_memory().unwrap();
        let breeds = Arc::new(StaticBreedRegistry::new(["Siamese", "Persian"]));
        let config = Config::new(PathBuf::from(crate::db::IN_MEMORY));
        app(Arc::new(AppState::new(config, db, breeds)))
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map(|v| v.to_string()).unwrap_or_default();
        send_raw(app, method, uri, &body).await
    }

    pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{send, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(&test_app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = send(&test_app(), "GET", "/dogs", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
