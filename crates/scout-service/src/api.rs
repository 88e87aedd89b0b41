//! HTTP API server.

use axum::{
	body::Bytes,
	extract::State,
	response::Json,
	routing::get,
	Router,
};
use scout_types::{ListRepositoriesRequest, RepositoryOutput};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::service::ScoutService;

#[derive(Clone)]
struct AppState {
	service: Arc<ScoutService>,
}

pub fn router(service: Arc<ScoutService>) -> Router {
	Router::new()
		.route("/health", get(health_check))
		.route("/repositories", get(list_repositories))
		.with_state(AppState { service })
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

/// Serves the API on `address` until `shutdown` is cancelled.
pub async fn start_http_server(
	service: Arc<ScoutService>,
	address: String,
	shutdown: CancellationToken,
) -> anyhow::Result<()> {
	let listener = tokio::net::TcpListener::bind(&address).await?;
	info!("API server listening on {}", address);

	axum::serve(listener, router(service))
		.with_graceful_shutdown(async move { shutdown.cancelled().await })
		.await?;

	info!("API server stopped");
	Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
	Json(serde_json::json!({
		"status": "ok",
		"timestamp": chrono::Utc::now().timestamp()
	}))
}

/// `GET /repositories`. The criteria travel as a JSON body; an empty body
/// means no criteria.
async fn list_repositories(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<Vec<RepositoryOutput>>, ApiError> {
	let request = parse_request(&body)?;
	debug!(?request, "Listing repositories");

	let repositories = state.service.list_repositories(request).await?;
	info!(count = repositories.len(), "Returning repositories");
	Ok(Json(repositories))
}

fn parse_request(body: &[u8]) -> Result<ListRepositoriesRequest, ApiError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(ListRepositoriesRequest::default());
	}
	serde_json::from_slice(body)
		.map_err(|e| ApiError::InvalidRequest(format!("Invalid request body: {}", e)))
}
